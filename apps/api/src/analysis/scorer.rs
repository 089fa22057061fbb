//! Scorer: asks the model to rate a candidate against a job, per category.
//!
//! The model's own notion of an overall score is ignored; weighting happens
//! in the aggregator. Missing categories are tolerated here and renormalized
//! away there.

use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::analysis::Analysis;
use crate::analysis::prompts::{MATCHING_PROMPT_TEMPLATE, MATCHING_SYSTEM};
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, PRONOUN_INSTRUCTION};
use crate::llm_client::{generate_json, LlmBackend, LlmError};
use crate::models::candidate::CandidateAttributes;
use crate::models::job::JobAttributes;
use crate::models::lenient::coerce_score;
use crate::models::matching::{Category, CategoryScore, CategoryScores, MatchScores};

/// Serializes both records into the comparison block, requirement first.
pub fn comparison_block(candidate: &CandidateAttributes, job: &JobAttributes) -> String {
    let job_json = serde_json::to_string(job).unwrap_or_default();
    let candidate_json = serde_json::to_string(candidate).unwrap_or_default();
    format!("\nRequirement: {job_json}\nCandidate: {candidate_json}")
}

pub fn matching_prompt(candidate: &CandidateAttributes, job: &JobAttributes) -> String {
    MATCHING_PROMPT_TEMPLATE
        .replace("{system_prompt}", MATCHING_SYSTEM)
        .replace("{pronoun_instruction}", PRONOUN_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{comparison}", &comparison_block(candidate, job))
}

pub async fn score_match(
    llm: &dyn LlmBackend,
    candidate: &CandidateAttributes,
    job: &JobAttributes,
) -> Analysis<MatchScores> {
    let started = Instant::now();
    info!("Start matching analysis via {}", llm.name());

    let prompt = matching_prompt(candidate, job);
    let parsed = generate_json::<Map<String, Value>>(llm, &prompt)
        .await
        .and_then(parse_scores);

    let outcome = match parsed {
        Ok(scores) => Analysis::Ok(scores),
        Err(cause) => {
            error!("Error analysing matching with {}: {cause}", llm.name());
            Analysis::Failed {
                value: MatchScores::failed(),
                cause,
            }
        }
    };

    info!(
        "Done matching analysis in {}ms (failed={})",
        started.elapsed().as_millis(),
        outcome.is_failed()
    );
    outcome
}

/// Reads the six category objects and the summary out of the model's JSON.
///
/// Unknown keys are ignored. A present category must carry a numeric
/// `score`; `summary_comment` is required.
pub fn parse_scores(mut response: Map<String, Value>) -> Result<MatchScores, LlmError> {
    let mut categories = CategoryScores::new();

    for category in Category::ALL {
        let Some(entry) = response.remove(category.as_str()) else {
            warn!("Matching response has no '{category}' section");
            continue;
        };
        categories.insert(category, parse_category(category, &entry)?);
    }

    let summary_comment = match response.remove("summary_comment") {
        Some(Value::String(summary)) => summary,
        Some(other) => {
            return Err(LlmError::Schema(format!(
                "summary_comment must be a string, got {other}"
            )))
        }
        None => return Err(LlmError::Schema("missing summary_comment".to_string())),
    };

    Ok(MatchScores {
        categories,
        summary_comment,
    })
}

fn parse_category(category: Category, entry: &Value) -> Result<CategoryScore, LlmError> {
    let object = entry
        .as_object()
        .ok_or_else(|| LlmError::Schema(format!("'{category}' is not an object")))?;

    let score = object
        .get("score")
        .and_then(coerce_score)
        .ok_or_else(|| LlmError::Schema(format!("'{category}' has no numeric score")))?;

    let comment = match object.get("comment") {
        Some(Value::String(comment)) => comment.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    Ok(CategoryScore::new(score, comment))
}
