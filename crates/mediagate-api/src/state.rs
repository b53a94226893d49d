//! Shared application state

use mediagate_core::Config;
use mediagate_processing::IngestionPipeline;

/// State shared by all handlers. Built once at startup; holds no per-request data.
pub struct AppState {
    pub config: Config,
    pub pipeline: IngestionPipeline,
}
