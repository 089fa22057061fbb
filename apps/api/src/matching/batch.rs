//! Batch matching of every stored candidate against one job.
//!
//! Pairs that already have a stored result are skipped. The remaining pairs
//! are scored concurrently, at most `concurrency` LLM calls in flight. A
//! failing pair is logged and counted; it never aborts the batch.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::Pipeline;
use crate::models::candidate::CandidateRow;
use crate::models::job::{JobAttributes, JobRow};
use crate::store::Store;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Results stored by this run, including degraded ones.
    pub processed: usize,
    /// Pairs that already had a result.
    pub skipped: usize,
    /// Stored results whose scoring call failed (all-zero scores).
    pub degraded: usize,
    /// Pairs with nothing stored.
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairOutcome {
    Stored,
    Degraded,
    AlreadyStored,
    Failed,
}

impl BatchSummary {
    fn record(&mut self, outcome: PairOutcome) {
        match outcome {
            PairOutcome::Stored => self.processed += 1,
            PairOutcome::Degraded => {
                self.processed += 1;
                self.degraded += 1;
            }
            PairOutcome::AlreadyStored => self.skipped += 1,
            PairOutcome::Failed => self.failed += 1,
        }
    }
}

pub async fn process_job(
    store: Arc<dyn Store>,
    pipeline: Arc<Pipeline>,
    job: &JobRow,
    concurrency: usize,
) -> anyhow::Result<BatchSummary> {
    let started = std::time::Instant::now();
    let candidates = store.all_candidates().await?;
    let matched: HashSet<Uuid> = store
        .matches_for_job(job.id)
        .await?
        .into_iter()
        .map(|m| m.candidate_id)
        .collect();

    let mut summary = BatchSummary::default();
    let pending: Vec<CandidateRow> = candidates
        .into_iter()
        .filter(|c| {
            let seen = matched.contains(&c.id);
            if seen {
                summary.skipped += 1;
            }
            !seen
        })
        .collect();

    info!(
        job_id = %job.id,
        pending = pending.len(),
        skipped = summary.skipped,
        concurrency,
        "Batch matching started"
    );

    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let requirements = Arc::new(job.attributes.clone());
    let mut tasks = JoinSet::new();

    for candidate in pending {
        let store = Arc::clone(&store);
        let pipeline = Arc::clone(&pipeline);
        let requirements = Arc::clone(&requirements);
        let permits = Arc::clone(&permits);
        let job_id = job.id;

        tasks.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return PairOutcome::Failed;
            };
            match_one(store.as_ref(), &pipeline, &candidate, job_id, &requirements).await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => summary.record(outcome),
            Err(e) => {
                error!(job_id = %job.id, "Matching task aborted: {e}");
                summary.failed += 1;
            }
        }
    }

    info!(
        job_id = %job.id,
        processed = summary.processed,
        skipped = summary.skipped,
        degraded = summary.degraded,
        failed = summary.failed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Batch matching finished"
    );
    Ok(summary)
}

async fn match_one(
    store: &dyn Store,
    pipeline: &Pipeline,
    candidate: &CandidateRow,
    job_id: Uuid,
    requirements: &JobAttributes,
) -> PairOutcome {
    let analysis = match pipeline.match_pair(&candidate.attributes, requirements).await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!(candidate_id = %candidate.id, %job_id, "Match not stored: {e}");
            return PairOutcome::Failed;
        }
    };

    let degraded = analysis.is_failed();
    if let Some(cause) = analysis.cause() {
        warn!(candidate_id = %candidate.id, %job_id, "Storing zero scores: {cause}");
    }

    match store
        .save_match(candidate.id, job_id, analysis.value())
        .await
    {
        Ok(true) if degraded => PairOutcome::Degraded,
        Ok(true) => PairOutcome::Stored,
        Ok(false) => PairOutcome::AlreadyStored,
        Err(e) => {
            error!(candidate_id = %candidate.id, %job_id, "Saving match failed: {e:?}");
            PairOutcome::Failed
        }
    }
}
