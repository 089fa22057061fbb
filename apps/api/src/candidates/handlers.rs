use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::candidates::upload::{ingest_file, UploadResult};
use crate::errors::AppError;
use crate::models::candidate::{CandidateRow, CandidateUpdate};
use crate::pagination::PageParams;
use crate::state::AppState;

const FILES_FIELD: &str = "files";

#[derive(Serialize)]
pub struct UploadResponse {
    pub results: Vec<UploadResult>,
}

#[derive(Serialize)]
pub struct CandidateListResponse {
    pub results: Vec<CandidateRow>,
    pub total_page: i64,
    pub total_file: i64,
}

/// POST /api/v1/candidates/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut results = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let result = ingest_file(
            state.store.as_ref(),
            &state.pipeline,
            filename,
            bytes.to_vec(),
            state.config.max_upload_bytes,
        )
        .await;
        results.push(result);
    }

    if results.is_empty() {
        return Err(AppError::Validation(format!(
            "no files received in the '{FILES_FIELD}' field"
        )));
    }

    info!(files = results.len(), "Upload processed");
    Ok(Json(UploadResponse { results }))
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<CandidateListResponse>, AppError> {
    let page = params.validate()?;
    let (results, total) = state.store.list_candidates(page).await?;
    Ok(Json(CandidateListResponse {
        results,
        total_page: page.total_pages(total),
        total_file: total,
    }))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CandidateRow>, AppError> {
    let row = state
        .store
        .get_candidate(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    Ok(Json(row))
}

/// PUT /api/v1/candidates/:id
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<CandidateUpdate>,
) -> Result<Json<CandidateRow>, AppError> {
    if update.is_empty() {
        return Err(AppError::Validation("no fields to update".to_string()));
    }
    if !state.store.update_candidate(id, &update).await? {
        return Err(AppError::NotFound(format!("Candidate {id} not found")));
    }
    let row = state
        .store
        .get_candidate(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    Ok(Json(row))
}

/// DELETE /api/v1/candidates/:id
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_candidate(id).await? {
        return Err(AppError::NotFound(format!("Candidate {id} not found")));
    }
    info!(candidate_id = %id, "Candidate deleted");
    Ok(StatusCode::NO_CONTENT)
}
