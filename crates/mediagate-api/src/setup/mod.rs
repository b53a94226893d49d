//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded [`Config`] to a served router. The
//! pieces are split out so integration tests can build the same router around an
//! injected storage backend and pipeline.

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use mediagate_core::Config;
use mediagate_processing::IngestionPipeline;
use mediagate_storage::Storage;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config).await?;
    let state = build_state(config, storage)?;
    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}

/// Wire the ingestion pipeline around an already constructed storage backend.
pub fn build_state(config: Config, storage: Arc<dyn Storage>) -> Result<Arc<AppState>> {
    let pipeline = IngestionPipeline::from_config(&config, storage)
        .context("Failed to initialize ingestion pipeline")?;

    tracing::info!(
        ffprobe_path = %config.ffprobe_path(),
        ffmpeg_path = %config.ffmpeg_path(),
        max_concurrent_transcodes = config.max_concurrent_transcodes(),
        duration_tolerance_secs = config.duration_tolerance_secs(),
        "Ingestion pipeline initialized"
    );

    Ok(Arc::new(AppState { config, pipeline }))
}
