//! Pipeline: the only entry point the HTTP layer uses for analysis.
//!
//! Flow: ingest_candidate / ingest_job → extractor;
//!       match_pair → scorer → aggregator → MatchResult.
//!
//! Stateless: every call recomputes. Skip-if-exists and content-hash dedup
//! are the store's business.

use std::sync::Arc;

use crate::analysis::aggregator::{aggregate, AggregationError};
use crate::analysis::extractor::{extract_candidate, extract_job};
use crate::analysis::Analysis;
use crate::analysis::scorer::score_match;
use crate::llm_client::LlmBackend;
use crate::models::candidate::CandidateAttributes;
use crate::models::job::JobAttributes;
use crate::models::matching::MatchResult;

/// Built once at startup and shared through `AppState`.
#[derive(Clone)]
pub struct Pipeline {
    llm: Arc<dyn LlmBackend>,
}

impl Pipeline {
    pub fn new(llm: Arc<dyn LlmBackend>) -> Self {
        Self { llm }
    }

    pub fn backend_name(&self) -> &'static str {
        self.llm.name()
    }

    pub async fn ingest_candidate(&self, raw_text: &str) -> Analysis<CandidateAttributes> {
        extract_candidate(self.llm.as_ref(), raw_text).await
    }

    pub async fn ingest_job(&self, raw_text: &str) -> Analysis<JobAttributes> {
        extract_job(self.llm.as_ref(), raw_text).await
    }

    /// Scores the pair and attaches the weighted aggregate.
    ///
    /// A failed scoring call still yields a complete (all-zero) result; only a
    /// response with no usable category is an error.
    pub async fn match_pair(
        &self,
        candidate: &CandidateAttributes,
        job: &JobAttributes,
    ) -> Result<Analysis<MatchResult>, AggregationError> {
        score_match(self.llm.as_ref(), candidate, job)
            .await
            .try_map(|scores| -> Result<MatchResult, AggregationError> {
                let score = aggregate(&scores.categories)?;
                Ok(MatchResult {
                    categories: scores.categories,
                    summary_comment: scores.summary_comment,
                    score,
                })
            })
    }
}
