pub mod candidate;
pub mod job;
pub mod lenient;
pub mod matching;
