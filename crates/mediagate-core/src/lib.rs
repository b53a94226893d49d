//! Mediagate Core Library
//!
//! This crate provides the domain models, typed request parsing, error taxonomy and
//! configuration shared by the storage, processing and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IngestConfig};
pub use error::{ErrorMetadata, IngestError, LogLevel, ProcessingError, ValidationError};
pub use storage_types::StorageBackend;
