//! Mediagate API Library
//!
//! This crate provides the HTTP surface of the ingestion service: the upload and health
//! handlers, error rendering, router and server setup, and telemetry initialization.

mod api_doc;
pub mod constants;
mod handlers;
mod telemetry;

// Public modules
pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
