//! Persistence collaborator. Handlers and the batch matcher only see
//! `dyn Store`; Postgres is the production implementation.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::candidate::{CandidateRow, CandidateUpdate, NewCandidate};
use crate::models::job::{JobAttributes, JobChanges, JobRow};
use crate::models::matching::{MatchResult, MatchRow};
use crate::pagination::PageParams;

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgStore;

/// Outcome of a job edit that may collide with another job's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobEdit {
    Updated,
    NotFound,
    NameTaken,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Returns `None` when a candidate with the same file hash already exists.
    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<Option<CandidateRow>>;
    async fn find_candidate_by_hash(&self, filehash: &str) -> Result<Option<CandidateRow>>;
    async fn get_candidate(&self, id: Uuid) -> Result<Option<CandidateRow>>;
    /// Newest first, with the total row count.
    async fn list_candidates(&self, page: PageParams) -> Result<(Vec<CandidateRow>, i64)>;
    async fn all_candidates(&self) -> Result<Vec<CandidateRow>>;
    /// Returns false when no candidate has this id.
    async fn update_candidate(&self, id: Uuid, update: &CandidateUpdate) -> Result<bool>;
    /// Also removes the candidate's match results.
    async fn delete_candidate(&self, id: Uuid) -> Result<bool>;

    /// Returns `None` when the name is taken.
    async fn insert_job(
        &self,
        job_name: &str,
        job_description: &str,
        attributes: &JobAttributes,
    ) -> Result<Option<JobRow>>;
    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>>;
    async fn find_job_by_name(&self, job_name: &str) -> Result<Option<JobRow>>;
    /// Newest first, with the total row count.
    async fn list_jobs(&self, page: PageParams) -> Result<(Vec<JobRow>, i64)>;
    /// Sorted by name.
    async fn all_jobs(&self) -> Result<Vec<JobRow>>;
    async fn update_job(&self, id: Uuid, changes: &JobChanges) -> Result<JobEdit>;
    /// Also removes the job's match results.
    async fn delete_job(&self, id: Uuid) -> Result<bool>;

    async fn find_existing_match(&self, candidate_id: Uuid, job_id: Uuid)
        -> Result<Option<MatchRow>>;
    /// Appends a result for the pair. Returns false, leaving the stored
    /// result untouched, when the pair already has one.
    async fn save_match(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
        result: &MatchResult,
    ) -> Result<bool>;
    async fn matches_for_job(&self, job_id: Uuid) -> Result<Vec<MatchRow>>;
}
