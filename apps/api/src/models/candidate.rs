use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::lenient::{flag, null_as_default, string_list};

/// Comment written into the fallback record when extraction fails.
pub const CANDIDATE_FAILED_COMMENT: &str = "Analysis failed - please try again";
pub const UNKNOWN_CANDIDATE_NAME: &str = "Unknown";

/// Structured attributes extracted from a CV.
///
/// Lists are never null and strings are never null: every field falls back to
/// its empty value when the model omits it or sends `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct CandidateAttributes {
    #[serde(deserialize_with = "null_as_default")]
    pub candidate_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "string_list")]
    pub degree: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub experience: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub technical_skill: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub responsibility: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub certificate: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub soft_skill: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(deserialize_with = "string_list")]
    pub job_recommended: Vec<String>,
    /// 1 when the CV shows office-suite proficiency.
    #[serde(deserialize_with = "flag")]
    pub office: i32,
    /// 1 when the CV shows SQL proficiency.
    #[serde(deserialize_with = "flag")]
    pub sql: i32,
}

impl CandidateAttributes {
    /// The record returned in place of a failed extraction.
    pub fn failed() -> Self {
        Self {
            candidate_name: UNKNOWN_CANDIDATE_NAME.to_string(),
            comment: CANDIDATE_FAILED_COMMENT.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub cv_name: String,
    /// SHA-256 of the uploaded file; unique per candidate.
    pub filehash: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub attributes: CandidateAttributes,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub cv_name: String,
    pub filehash: String,
    pub attributes: CandidateAttributes,
}

/// Editable contact fields. Editing never re-runs extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateUpdate {
    pub candidate_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub comment: Option<String>,
}

impl CandidateUpdate {
    pub fn is_empty(&self) -> bool {
        self.candidate_name.is_none()
            && self.phone_number.is_none()
            && self.email.is_none()
            && self.comment.is_none()
    }
}
