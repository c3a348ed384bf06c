mod config;
mod db;
mod errors;
mod extraction;
mod grading;
mod ingest;
mod jobs;
mod models;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::extraction::{Extractor, ToolConfig};
use crate::grading::GradingClient;
use crate::ingest::pipeline::Ingestor;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{PgRepository, Repository};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shortlister API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;
    let repo: Arc<dyn Repository> = Arc::new(PgRepository::new(db));

    std::fs::create_dir_all(&config.staging_dir).with_context(|| {
        format!(
            "Failed to create staging dir {}",
            config.staging_dir.display()
        )
    })?;
    info!("Staging uploads under {}", config.staging_dir.display());

    // Initialize grading client
    if config.gemini_api_url.is_none() {
        warn!("GEMINI_API_URL is not set; every resume upload will fail until it is configured");
    }
    let grader = GradingClient::new(
        config.gemini_api_url.clone(),
        config.gemini_api_key.clone(),
        config.grading_timeout,
    )?;

    let extractor = Extractor::new(ToolConfig::from_config(&config));
    let ingestor = Ingestor::new(
        repo.clone(),
        grader,
        extractor,
        config.staging_dir.clone(),
    );

    // Build app state
    let state = AppState {
        repo,
        ingestor: Arc::new(ingestor),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
