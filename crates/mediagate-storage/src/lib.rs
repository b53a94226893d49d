//! Mediagate Storage Library
//!
//! This crate provides the storage abstraction the ingestion pipeline publishes to,
//! with an S3-compatible backend and a local filesystem backend.
//!
//! # Storage key format
//!
//! Every upload lands under `uploads/{filename}`, where the filename is
//! `{id}.{extension}`. Keys must not contain `..` or a leading `/`. Key generation
//! and validation live in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::generate_storage_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use mediagate_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectInfo, Storage, StorageError, StorageResult};
