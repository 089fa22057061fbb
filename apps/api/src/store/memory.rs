//! In-memory store for tests. Mirrors the Postgres semantics that callers
//! rely on: hash/name lookups, cascade deletes, one match per pair.

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::candidate::{CandidateRow, CandidateUpdate, NewCandidate};
use crate::models::job::{JobAttributes, JobChanges, JobRow};
use crate::models::matching::{MatchResult, MatchRow};
use crate::pagination::PageParams;
use crate::store::{JobEdit, Store};

#[derive(Default)]
struct Tables {
    candidates: Vec<CandidateRow>,
    jobs: Vec<JobRow>,
    matches: Vec<MatchRow>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing_saves: Mutex<HashSet<Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `save_match` fail for this candidate.
    pub fn fail_saves_for(&self, candidate_id: Uuid) {
        self.failing_saves.lock().unwrap().insert(candidate_id);
    }

    pub fn match_count(&self) -> usize {
        self.tables.lock().unwrap().matches.len()
    }
}

fn newest_first<T: Clone>(rows: &[T], created: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    let mut rows = rows.to_vec();
    rows.sort_by_key(|r| std::cmp::Reverse(created(r)));
    rows
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<Option<CandidateRow>> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .candidates
            .iter()
            .any(|c| c.filehash == candidate.filehash)
        {
            return Ok(None);
        }
        let row = CandidateRow {
            id: Uuid::new_v4(),
            cv_name: candidate.cv_name,
            filehash: candidate.filehash,
            attributes: candidate.attributes,
            created_at: Utc::now(),
        };
        tables.candidates.push(row.clone());
        Ok(Some(row))
    }

    async fn find_candidate_by_hash(&self, filehash: &str) -> Result<Option<CandidateRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .candidates
            .iter()
            .find(|c| c.filehash == filehash)
            .cloned())
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<CandidateRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.candidates.iter().find(|c| c.id == id).cloned())
    }

    async fn list_candidates(&self, page: PageParams) -> Result<(Vec<CandidateRow>, i64)> {
        let tables = self.tables.lock().unwrap();
        let rows = newest_first(&tables.candidates, |c| c.created_at);
        let total = rows.len() as i64;
        Ok((page.slice(rows), total))
    }

    async fn all_candidates(&self) -> Result<Vec<CandidateRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(&tables.candidates, |c| c.created_at))
    }

    async fn update_candidate(&self, id: Uuid, update: &CandidateUpdate) -> Result<bool> {
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables.candidates.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        let attrs = &mut row.attributes;
        if let Some(v) = &update.candidate_name {
            attrs.candidate_name = v.clone();
        }
        if let Some(v) = &update.phone_number {
            attrs.phone_number = v.clone();
        }
        if let Some(v) = &update.email {
            attrs.email = v.clone();
        }
        if let Some(v) = &update.comment {
            attrs.comment = v.clone();
        }
        Ok(true)
    }

    async fn delete_candidate(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.candidates.len();
        tables.candidates.retain(|c| c.id != id);
        tables.matches.retain(|m| m.candidate_id != id);
        Ok(tables.candidates.len() < before)
    }

    async fn insert_job(
        &self,
        job_name: &str,
        job_description: &str,
        attributes: &JobAttributes,
    ) -> Result<Option<JobRow>> {
        let mut tables = self.tables.lock().unwrap();
        if tables.jobs.iter().any(|j| j.job_name == job_name) {
            return Ok(None);
        }
        let row = JobRow {
            id: Uuid::new_v4(),
            job_name: job_name.to_string(),
            job_description: job_description.to_string(),
            attributes: attributes.clone(),
            created_at: Utc::now(),
        };
        tables.jobs.push(row.clone());
        Ok(Some(row))
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn find_job_by_name(&self, job_name: &str) -> Result<Option<JobRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.jobs.iter().find(|j| j.job_name == job_name).cloned())
    }

    async fn list_jobs(&self, page: PageParams) -> Result<(Vec<JobRow>, i64)> {
        let tables = self.tables.lock().unwrap();
        let rows = newest_first(&tables.jobs, |j| j.created_at);
        let total = rows.len() as i64;
        Ok((page.slice(rows), total))
    }

    async fn all_jobs(&self) -> Result<Vec<JobRow>> {
        let tables = self.tables.lock().unwrap();
        let mut rows = tables.jobs.clone();
        rows.sort_by(|a, b| a.job_name.cmp(&b.job_name));
        Ok(rows)
    }

    async fn update_job(&self, id: Uuid, changes: &JobChanges) -> Result<JobEdit> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(name) = &changes.job_name {
            if tables.jobs.iter().any(|j| j.id != id && &j.job_name == name) {
                return Ok(JobEdit::NameTaken);
            }
        }
        let Some(row) = tables.jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(JobEdit::NotFound);
        };
        if let Some(v) = &changes.job_name {
            row.job_name = v.clone();
        }
        if let Some(v) = &changes.job_description {
            row.job_description = v.clone();
        }
        if let Some(attributes) = &changes.attributes {
            row.attributes = attributes.clone();
        }
        Ok(JobEdit::Updated)
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.jobs.len();
        tables.jobs.retain(|j| j.id != id);
        tables.matches.retain(|m| m.job_id != id);
        Ok(tables.jobs.len() < before)
    }

    async fn find_existing_match(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<MatchRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .matches
            .iter()
            .find(|m| m.candidate_id == candidate_id && m.job_id == job_id)
            .cloned())
    }

    async fn save_match(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
        result: &MatchResult,
    ) -> Result<bool> {
        if self.failing_saves.lock().unwrap().contains(&candidate_id) {
            return Err(anyhow!("simulated write failure"));
        }
        let mut tables = self.tables.lock().unwrap();
        if tables
            .matches
            .iter()
            .any(|m| m.candidate_id == candidate_id && m.job_id == job_id)
        {
            return Ok(false);
        }
        tables.matches.push(MatchRow {
            id: Uuid::new_v4(),
            candidate_id,
            job_id,
            categories: Json(result.categories.clone()),
            summary_comment: result.summary_comment.clone(),
            score: result.score,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn matches_for_job(&self, job_id: Uuid) -> Result<Vec<MatchRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .matches
            .iter()
            .filter(|m| m.job_id == job_id)
            .cloned()
            .collect())
    }
}
