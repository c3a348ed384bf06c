use std::sync::Arc;

use crate::config::Config;
use crate::ingest::pipeline::Ingestor;
use crate::store::Repository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend, built once at startup.
    pub repo: Arc<dyn Repository>,
    pub ingestor: Arc<Ingestor>,
    pub config: Config,
}
