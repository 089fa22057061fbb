use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::lenient::string_list;

/// Structured requirements extracted from a job description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct JobAttributes {
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
}

impl JobAttributes {
    /// The record returned in place of a failed extraction.
    pub fn failed() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub job_name: String,
    pub job_description: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub attributes: JobAttributes,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobCreate {
    pub job_name: String,
    pub job_description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobUpdate {
    pub job_name: Option<String>,
    pub job_description: Option<String>,
}

impl JobUpdate {
    pub fn is_empty(&self) -> bool {
        self.job_name.is_none() && self.job_description.is_none()
    }
}

/// A resolved update. `attributes` is set only when the description changed
/// and was re-extracted.
#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub job_name: Option<String>,
    pub job_description: Option<String>,
    pub attributes: Option<JobAttributes>,
}
