use async_trait::async_trait;
use bytes::Bytes;
use mediagate_core::ProcessingError;
use mediagate_processing::{DurationProbe, Transcoder};
use mediagate_storage::{ObjectInfo, Storage, StorageBackend, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Reports a fixed duration, or fails when constructed with `None`.
pub struct FixedProbe {
    duration: Option<f64>,
    calls: AtomicUsize,
}

impl FixedProbe {
    pub fn new(duration: Option<f64>) -> Self {
        Self {
            duration,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DurationProbe for FixedProbe {
    async fn probe(&self, _data: &Bytes) -> Result<f64, ProcessingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.duration.ok_or(ProcessingError::ProbeFailed)
    }
}

/// Prefixes the input with `encoded:` so tests can tell transcoded bytes apart.
#[derive(Default)]
pub struct TaggingTranscoder {
    calls: AtomicUsize,
}

impl TaggingTranscoder {
    pub const TAG: &'static [u8] = b"encoded:";

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcoder for TaggingTranscoder {
    async fn transcode(&self, data: Bytes, _extension: &str) -> Result<Bytes, ProcessingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut out = Self::TAG.to_vec();
        out.extend_from_slice(&data);
        Ok(Bytes::from(out))
    }
}

/// One recorded `put_object` call.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub data: Bytes,
    pub content_type: String,
    pub metadata: BTreeMap<String, String>,
}

/// In-memory storage that records every write.
#[derive(Default)]
pub struct RecordingStorage {
    writes: Mutex<Vec<StoredObject>>,
}

impl RecordingStorage {
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn writes(&self) -> Vec<StoredObject> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
        metadata: &BTreeMap<String, String>,
    ) -> StorageResult<String> {
        self.writes.lock().unwrap().push(StoredObject {
            key: storage_key.to_string(),
            data,
            content_type: content_type.to_string(),
            metadata: metadata.clone(),
        });
        Ok(self.public_url(storage_key))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self
            .writes
            .lock()
            .unwrap()
            .iter()
            .any(|w| w.key == storage_key))
    }

    async fn metadata(&self, storage_key: &str) -> StorageResult<ObjectInfo> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.key == storage_key)
            .map(|w| ObjectInfo {
                key: w.key.clone(),
                size: w.data.len() as u64,
                content_type: Some(w.content_type.clone()),
                metadata: w.metadata.clone(),
            })
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("http://localhost:8080/media/{}", storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
