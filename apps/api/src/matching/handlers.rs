use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::batch::{process_job, BatchSummary};
use crate::matching::ranking::{detail, rank, MatchDetail, RankedCandidate};
use crate::models::job::JobRow;
use crate::pagination::PageParams;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ProcessRequest {
    pub job_name: String,
}

#[derive(Deserialize)]
pub struct ResultsQuery {
    pub job_name: String,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ResultsQuery {
    fn page_params(&self) -> PageParams {
        let defaults = PageParams::default();
        PageParams {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        }
    }
}

#[derive(Serialize)]
pub struct ResultsResponse {
    pub results: Vec<RankedCandidate>,
    pub total_page: i64,
    pub total_matching: i64,
}

async fn job_by_name(state: &AppState, job_name: &str) -> Result<JobRow, AppError> {
    state
        .store
        .find_job_by_name(job_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job '{job_name}' not found")))
}

/// POST /api/v1/matching/process
pub async fn handle_process(
    State(state): State<AppState>,
    Json(req): Json<ProcessRequest>,
) -> Result<Json<BatchSummary>, AppError> {
    let job = job_by_name(&state, &req.job_name).await?;
    let summary = process_job(
        Arc::clone(&state.store),
        Arc::clone(&state.pipeline),
        &job,
        state.config.match_concurrency,
    )
    .await?;
    Ok(Json(summary))
}

/// GET /api/v1/matching/results
pub async fn handle_results(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<ResultsResponse>, AppError> {
    let page = query.page_params().validate()?;
    let job = job_by_name(&state, &query.job_name).await?;

    let candidates = state.store.all_candidates().await?;
    let matches = state.store.matches_for_job(job.id).await?;
    let ranked = rank(candidates, &matches);

    let total = ranked.len() as i64;
    Ok(Json(ResultsResponse {
        results: page.slice(ranked),
        total_page: page.total_pages(total),
        total_matching: total,
    }))
}

/// GET /api/v1/matching/detail/:candidate_id/:job_id
pub async fn handle_detail(
    State(state): State<AppState>,
    Path((candidate_id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MatchDetail>, AppError> {
    let candidate = state
        .store
        .get_candidate(candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
    let job = state
        .store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let stored = state.store.find_existing_match(candidate_id, job_id).await?;
    Ok(Json(detail(&candidate, &job, stored.as_ref())))
}
