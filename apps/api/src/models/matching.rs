use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const CATEGORY_FAILED_COMMENT: &str = "Analysis failed";
pub const SUMMARY_FAILED_COMMENT: &str = "Analysis failed - please try again";

/// A rubric category scored per (candidate, job) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Degree,
    Experience,
    TechnicalSkill,
    Responsibility,
    Certificate,
    SoftSkill,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Degree,
        Category::Experience,
        Category::TechnicalSkill,
        Category::Responsibility,
        Category::Certificate,
        Category::SoftSkill,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Degree => "degree",
            Category::Experience => "experience",
            Category::TechnicalSkill => "technical_skill",
            Category::Responsibility => "responsibility",
            Category::Certificate => "certificate",
            Category::SoftSkill => "soft_skill",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// 0 – 100
    pub score: u8,
    pub comment: String,
}

impl CategoryScore {
    pub fn new(score: u8, comment: impl Into<String>) -> Self {
        Self {
            score: score.min(100),
            comment: comment.into(),
        }
    }
}

pub type CategoryScores = BTreeMap<Category, CategoryScore>;

/// Per-category scores as produced by the scorer, before weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScores {
    pub categories: CategoryScores,
    pub summary_comment: String,
}

impl MatchScores {
    /// The scores returned in place of a failed scoring call. All six
    /// categories are present, so the aggregate is always defined (0.0).
    pub fn failed() -> Self {
        Self {
            categories: Category::ALL
                .into_iter()
                .map(|c| (c, CategoryScore::new(0, CATEGORY_FAILED_COMMENT)))
                .collect(),
            summary_comment: SUMMARY_FAILED_COMMENT.to_string(),
        }
    }
}

/// Scores plus the weighted aggregate. `score` is always computed from the
/// category scores and never taken from the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub categories: CategoryScores,
    pub summary_comment: String,
    pub score: f64,
}

#[derive(Debug, Clone, FromRow)]
pub struct MatchRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub categories: Json<CategoryScores>,
    pub summary_comment: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

impl MatchRow {
    pub fn result(&self) -> MatchResult {
        MatchResult {
            categories: self.categories.0.clone(),
            summary_comment: self.summary_comment.clone(),
            score: self.score,
        }
    }
}
