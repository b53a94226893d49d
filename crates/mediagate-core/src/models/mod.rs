//! Data models for the application

mod asset;
mod media;
mod upload;

pub use asset::{AssetMetadata, MediaAsset, StorageObject, UploadResponse};
pub use media::MediaType;
pub use upload::{extension_from_content_type, UploadFields, UploadKind, UploadRequest};
