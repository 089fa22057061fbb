//! Extractor: turns raw CV / job description text into structured records.
//!
//! Exactly one LLM call per invocation. Any failure (transport, non-2xx,
//! timeout, unparseable or mis-shaped JSON) yields the documented fallback
//! record wrapped in `Analysis::Failed`.

use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::analysis::Analysis;
use crate::analysis::prompts::{
    CANDIDATE_PROMPT_TEMPLATE, CANDIDATE_SYSTEM, JOB_PROMPT_TEMPLATE, JOB_SYSTEM,
};
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, PRONOUN_INSTRUCTION};
use crate::llm_client::{generate_json, LlmBackend};
use crate::models::candidate::CandidateAttributes;
use crate::models::job::JobAttributes;

pub fn candidate_prompt(cv_text: &str) -> String {
    CANDIDATE_PROMPT_TEMPLATE
        .replace("{system_prompt}", CANDIDATE_SYSTEM)
        .replace("{pronoun_instruction}", PRONOUN_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{cv_text}", cv_text)
}

pub fn job_prompt(description_text: &str) -> String {
    JOB_PROMPT_TEMPLATE
        .replace("{system_prompt}", JOB_SYSTEM)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{job_description}", description_text)
}

pub async fn extract_candidate(
    llm: &dyn LlmBackend,
    cv_text: &str,
) -> Analysis<CandidateAttributes> {
    run_extraction(
        llm,
        "candidate",
        &candidate_prompt(cv_text),
        CandidateAttributes::failed,
    )
    .await
}

pub async fn extract_job(llm: &dyn LlmBackend, description_text: &str) -> Analysis<JobAttributes> {
    run_extraction(llm, "job", &job_prompt(description_text), JobAttributes::failed).await
}

async fn run_extraction<T: DeserializeOwned>(
    llm: &dyn LlmBackend,
    kind: &str,
    prompt: &str,
    fallback: fn() -> T,
) -> Analysis<T> {
    let started = Instant::now();
    info!("Start {kind} extraction via {}", llm.name());

    let outcome = match generate_json::<T>(llm, prompt).await {
        Ok(record) => Analysis::Ok(record),
        Err(cause) => {
            error!("Error extracting {kind} with {}: {cause}", llm.name());
            Analysis::Failed {
                value: fallback(),
                cause,
            }
        }
    };

    info!(
        "Done {kind} extraction in {}ms (failed={})",
        started.elapsed().as_millis(),
        outcome.is_failed()
    );
    outcome
}
