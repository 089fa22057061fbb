use std::sync::Arc;

use crate::analysis::Pipeline;
use crate::config::Config;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Extraction and matching over the configured LLM backend.
    pub pipeline: Arc<Pipeline>,
    pub config: Config,
}
