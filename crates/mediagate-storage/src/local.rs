use crate::keys::validate_key;
use crate::traits::{ObjectInfo, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const METADATA_SUFFIX: &str = ".metadata.json";

/// Sidecar document persisted next to every object.
#[derive(Debug, Serialize, Deserialize)]
struct Sidecar {
    content_type: String,
    metadata: BTreeMap<String, String>,
}

/// Local filesystem storage implementation
///
/// Objects are written under `base_path/{key}`; content type and metadata live in a
/// JSON sidecar at `base_path/{key}.metadata.json`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/mediagate")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8080/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        if storage_key.ends_with(METADATA_SUFFIX) {
            return Err(StorageError::InvalidKey(
                "Storage key collides with metadata sidecar".to_string(),
            ));
        }
        Ok(self.base_path.join(storage_key))
    }

    fn sidecar_path(path: &Path) -> PathBuf {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(METADATA_SUFFIX);
        PathBuf::from(sidecar)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_file(path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
        metadata: &BTreeMap<String, String>,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let sidecar = serde_json::to_vec(&Sidecar {
            content_type: content_type.to_string(),
            metadata: metadata.clone(),
        })
        .map_err(|e| StorageError::UploadFailed(format!("Failed to encode metadata: {}", e)))?;

        // Sidecar first so a visible object always has its metadata.
        Self::write_file(&Self::sidecar_path(&path), &sidecar).await?;
        Self::write_file(&path, &data).await?;

        let url = self.public_url(storage_key);

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn metadata(&self, storage_key: &str) -> StorageResult<ObjectInfo> {
        let path = self.key_to_path(storage_key)?;

        let file_meta = match fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(storage_key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let sidecar: Option<Sidecar> = match fs::read(Self::sidecar_path(&path)).await {
            Ok(raw) => Some(serde_json::from_slice(&raw).map_err(|e| {
                StorageError::BackendError(format!(
                    "Corrupt metadata sidecar for {}: {}",
                    storage_key, e
                ))
            })?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let (content_type, metadata) = match sidecar {
            Some(s) => (Some(s.content_type), s.metadata),
            None => (None, BTreeMap::new()),
        };

        Ok(ObjectInfo {
            key: storage_key.to_string(),
            size: file_meta.len(),
            content_type,
            metadata,
        })
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, "http://localhost:8080/media/".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_put_object_writes_data_and_sidecar() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let mut metadata = BTreeMap::new();
        metadata.insert("type".to_string(), "video".to_string());
        metadata.insert("duration".to_string(), "9.9".to_string());

        let url = storage
            .put_object(
                "uploads/clip.mp4",
                Bytes::from_static(b"video bytes"),
                "video/mp4",
                &metadata,
            )
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:8080/media/uploads/clip.mp4");
        assert_eq!(
            std::fs::read(dir.path().join("uploads/clip.mp4")).unwrap(),
            b"video bytes"
        );
        assert!(dir.path().join("uploads/clip.mp4.metadata.json").exists());

        let info = storage.metadata("uploads/clip.mp4").await.unwrap();
        assert_eq!(info.size, 11);
        assert_eq!(info.content_type.as_deref(), Some("video/mp4"));
        assert_eq!(info.metadata, metadata);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage
            .put_object(
                "../../../etc/passwd",
                Bytes::from_static(b"x"),
                "text/plain",
                &BTreeMap::new(),
            )
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.metadata("uploads/a.png.metadata.json").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_exists_and_missing_metadata() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        storage
            .put_object(
                "uploads/a.png",
                Bytes::from_static(b"png"),
                "image/png",
                &BTreeMap::new(),
            )
            .await
            .unwrap();

        assert!(storage.exists("uploads/a.png").await.unwrap());
        assert!(!storage.exists("uploads/b.png").await.unwrap());
        assert!(matches!(
            storage.metadata("uploads/b.png").await,
            Err(StorageError::NotFound(_))
        ));
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }
}
