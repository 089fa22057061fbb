// Matching core: extraction, scoring, weighting.
// All LLM calls go through llm_client; no direct provider calls here.

pub mod aggregator;
pub mod extractor;
pub mod outcome;
pub mod pipeline;
pub mod prompts;
pub mod scorer;

pub use outcome::Analysis;
pub use pipeline::Pipeline;
