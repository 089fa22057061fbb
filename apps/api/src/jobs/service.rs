use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::Pipeline;
use crate::errors::AppError;
use crate::models::job::{JobChanges, JobCreate, JobRow, JobUpdate};
use crate::store::{JobEdit, Store};

#[derive(Debug, Serialize)]
pub struct JobResponse {
    #[serde(flatten)]
    pub job: JobRow,
    /// True when requirement extraction fell back to empty lists.
    pub analysis_failed: bool,
}

fn name_taken(job_name: &str) -> AppError {
    AppError::Conflict(format!("A job named '{job_name}' already exists"))
}

fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

async fn ensure_name_free(
    store: &dyn Store,
    job_name: &str,
    except: Option<Uuid>,
) -> Result<(), AppError> {
    match store.find_job_by_name(job_name).await? {
        Some(existing) if Some(existing.id) != except => Err(name_taken(job_name)),
        _ => Ok(()),
    }
}

pub async fn create_job(
    store: &dyn Store,
    pipeline: &Pipeline,
    req: JobCreate,
) -> Result<JobResponse, AppError> {
    let job_name = require_text("job_name", &req.job_name)?;
    let job_description = require_text("job_description", &req.job_description)?;
    ensure_name_free(store, &job_name, None).await?;

    let analysis = pipeline.ingest_job(&job_description).await;
    let analysis_failed = analysis.is_failed();
    if let Some(cause) = analysis.cause() {
        warn!(
            job_name = %job_name,
            "Storing job with empty requirements after failed extraction: {cause}"
        );
    }

    // The unique index settles a concurrent create of the same name.
    let job = store
        .insert_job(&job_name, &job_description, analysis.value())
        .await?
        .ok_or_else(|| name_taken(&job_name))?;
    info!(job_id = %job.id, job_name = %job_name, "Job created");
    Ok(JobResponse {
        job,
        analysis_failed,
    })
}

/// Applies an edit. A new description is re-extracted; stored match
/// results for the job are left as they are.
pub async fn update_job(
    store: &dyn Store,
    pipeline: &Pipeline,
    id: Uuid,
    req: JobUpdate,
) -> Result<JobResponse, AppError> {
    if req.is_empty() {
        return Err(AppError::Validation("no fields to update".to_string()));
    }
    if store.get_job(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }

    let mut changes = JobChanges::default();
    if let Some(name) = &req.job_name {
        let name = require_text("job_name", name)?;
        ensure_name_free(store, &name, Some(id)).await?;
        changes.job_name = Some(name);
    }

    let mut analysis_failed = false;
    if let Some(description) = &req.job_description {
        let description = require_text("job_description", description)?;
        let analysis = pipeline.ingest_job(&description).await;
        analysis_failed = analysis.is_failed();
        if let Some(cause) = analysis.cause() {
            warn!(job_id = %id, "Re-extraction failed, requirements cleared: {cause}");
        }
        changes.job_description = Some(description);
        changes.attributes = Some(analysis.into_value());
    }

    match store.update_job(id, &changes).await? {
        JobEdit::Updated => {}
        JobEdit::NotFound => return Err(AppError::NotFound(format!("Job {id} not found"))),
        JobEdit::NameTaken => {
            return Err(name_taken(changes.job_name.as_deref().unwrap_or_default()))
        }
    }
    let job = store
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    info!(job_id = %id, "Job updated");
    Ok(JobResponse {
        job,
        analysis_failed,
    })
}
