use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::service::{create_job, update_job, JobResponse};
use crate::models::job::{JobCreate, JobRow, JobUpdate};
use crate::pagination::PageParams;
use crate::state::AppState;

#[derive(Serialize)]
pub struct JobListResponse {
    pub results: Vec<JobRow>,
    pub total_page: i64,
    pub total_job: i64,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<JobCreate>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    let job = create_job(state.store.as_ref(), &state.pipeline, req).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<JobListResponse>, AppError> {
    let page = params.validate()?;
    let (results, total) = state.store.list_jobs(page).await?;
    Ok(Json(JobListResponse {
        results,
        total_page: page.total_pages(total),
        total_job: total,
    }))
}

/// GET /api/v1/jobs/all
pub async fn handle_all_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(state.store.all_jobs().await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let job = state
        .store
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<JobUpdate>,
) -> Result<Json<JobResponse>, AppError> {
    let job = update_job(state.store.as_ref(), &state.pipeline, id, req).await?;
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_job(id).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    info!(job_id = %id, "Job deleted");
    Ok(StatusCode::NO_CONTENT)
}
