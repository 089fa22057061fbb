use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::candidate::CandidateRow;
use crate::models::job::JobRow;
use crate::models::matching::{Category, CategoryScore, MatchResult, MatchRow};

pub const NOT_ANALYZED_COMMENT: &str = "Not analyzed";
pub const NO_ANALYSIS_SUMMARY: &str = "No matching analysis available";

/// One row of the ranked results for a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub candidate_id: Uuid,
    pub cv_name: String,
    pub candidate_name: String,
    pub email: String,
    pub phone_number: String,
    pub score: f64,
    /// Empty when the pair has not been matched yet.
    pub summary_comment: String,
    /// False when the pair has not been matched yet; `score` is then 0.
    pub matching_status: bool,
}

/// Every candidate with its score for the job, best first. Ties keep a
/// stable order by file name.
pub fn rank(candidates: Vec<CandidateRow>, matches: &[MatchRow]) -> Vec<RankedCandidate> {
    let by_candidate: HashMap<Uuid, &MatchRow> =
        matches.iter().map(|m| (m.candidate_id, m)).collect();

    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|c| {
            let stored = by_candidate.get(&c.id);
            RankedCandidate {
                candidate_id: c.id,
                cv_name: c.cv_name,
                candidate_name: c.attributes.candidate_name,
                email: c.attributes.email,
                phone_number: c.attributes.phone_number,
                score: stored.map_or(0.0, |m| m.score),
                summary_comment: stored
                    .map(|m| m.summary_comment.clone())
                    .unwrap_or_default(),
                matching_status: stored.is_some(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.cv_name.cmp(&b.cv_name))
    });
    ranked
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchDetail {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub cv_name: String,
    pub candidate_name: String,
    pub email: String,
    pub phone_number: String,
    pub job_recommended: Vec<String>,
    pub job_name: String,
    pub matching_status: bool,
    pub match_id: Option<Uuid>,
    pub matched_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// Full per-category breakdown. An unmatched pair reads as all zeros.
pub fn detail(candidate: &CandidateRow, job: &JobRow, stored: Option<&MatchRow>) -> MatchDetail {
    let result = stored.map(MatchRow::result).unwrap_or_else(|| MatchResult {
        categories: Category::ALL
            .into_iter()
            .map(|c| (c, CategoryScore::new(0, NOT_ANALYZED_COMMENT)))
            .collect(),
        summary_comment: NO_ANALYSIS_SUMMARY.to_string(),
        score: 0.0,
    });

    MatchDetail {
        candidate_id: candidate.id,
        job_id: job.id,
        cv_name: candidate.cv_name.clone(),
        candidate_name: candidate.attributes.candidate_name.clone(),
        email: candidate.attributes.email.clone(),
        phone_number: candidate.attributes.phone_number.clone(),
        job_recommended: candidate.attributes.job_recommended.clone(),
        job_name: job.job_name.clone(),
        matching_status: stored.is_some(),
        match_id: stored.map(|m| m.id),
        matched_at: stored.map(|m| m.created_at),
        result,
    }
}
