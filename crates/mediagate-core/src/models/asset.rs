use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

use super::media::MediaType;
use crate::constants::{METADATA_DESCRIPTION, METADATA_DURATION, METADATA_TITLE, METADATA_TYPE};

/// Descriptive metadata attached to a stored object.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetMetadata {
    pub media_type: MediaType,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Measured duration in seconds; only ever set for videos.
    pub duration: Option<f64>,
}

impl AssetMetadata {
    /// Flatten into the string map object stores accept. Absent fields are omitted.
    pub fn to_object_metadata(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert(METADATA_TYPE.to_string(), self.media_type.to_string());
        if let Some(title) = &self.title {
            map.insert(METADATA_TITLE.to_string(), title.clone());
        }
        if let Some(description) = &self.description {
            map.insert(METADATA_DESCRIPTION.to_string(), description.clone());
        }
        if let Some(duration) = self.duration {
            map.insert(METADATA_DURATION.to_string(), duration.to_string());
        }
        map
    }
}

/// The final, storable form of one upload.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    pub id: Uuid,
    pub extension: String,
    pub content_type: String,
    pub data: Bytes,
    pub metadata: AssetMetadata,
}

impl MediaAsset {
    pub fn filename(&self) -> String {
        format!("{}.{}", self.id, self.extension)
    }
}

/// A persisted object and its public locator.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageObject {
    pub key: String,
    pub filename: String,
    pub url: String,
    pub size: usize,
}

/// Successful upload response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// `{id}.{extension}`
    pub filename: String,
    /// Public locator of the stored object
    pub url: String,
    /// Byte length of the stored payload
    pub size: usize,
}

impl From<StorageObject> for UploadResponse {
    fn from(object: StorageObject) -> Self {
        UploadResponse {
            filename: object.filename,
            url: object.url,
            size: object.size,
        }
    }
}
