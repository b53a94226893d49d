//! Ingestion pipeline: classify → (probe → tolerance check → transcode) → store.
//!
//! Validation failures return before the transcoder or the storage backend is touched,
//! so a rejected upload never leaves anything behind. A successful upload performs
//! exactly one storage write.

use anyhow::Result;
use mediagate_core::models::{AssetMetadata, MediaAsset, StorageObject, UploadKind, UploadRequest};
use mediagate_core::{Config, IngestError, ProcessingError, ValidationError};
use mediagate_storage::{generate_storage_key, Storage};
use std::sync::Arc;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::probe::{DurationProbe, FfprobeDurationProbe};
use crate::scratch::ScratchSpace;
use crate::tolerance::within_tolerance;
use crate::transcode::{FfmpegTranscoder, TranscodeSettings, Transcoder};

pub struct IngestionPipeline {
    storage: Arc<dyn Storage>,
    probe: Arc<dyn DurationProbe>,
    transcoder: Arc<dyn Transcoder>,
    /// Bounds concurrent probe + transcode work.
    video_permits: Semaphore,
    tolerance_secs: f64,
}

impl IngestionPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        probe: Arc<dyn DurationProbe>,
        transcoder: Arc<dyn Transcoder>,
        max_concurrent_transcodes: usize,
        tolerance_secs: f64,
    ) -> Self {
        Self {
            storage,
            probe,
            transcoder,
            video_permits: Semaphore::new(max_concurrent_transcodes.max(1)),
            tolerance_secs,
        }
    }

    /// Wire the ffprobe/ffmpeg implementations from configuration.
    pub fn from_config(config: &Config, storage: Arc<dyn Storage>) -> Result<Self> {
        let scratch = match config.scratch_dir() {
            Some(dir) => ScratchSpace::in_dir(dir),
            None => ScratchSpace::system(),
        };

        let probe = FfprobeDurationProbe::new(config.ffprobe_path().to_string(), scratch.clone())?;
        let transcoder = FfmpegTranscoder::new(
            config.ffmpeg_path().to_string(),
            TranscodeSettings::from_config(config),
            scratch,
        )?;

        Ok(Self::new(
            storage,
            Arc::new(probe),
            Arc::new(transcoder),
            config.max_concurrent_transcodes(),
            config.duration_tolerance_secs(),
        ))
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Run one upload through the pipeline.
    #[tracing::instrument(skip(self, request), fields(
        media_type = %request.media_type(),
        content_type = %request.content_type,
        size_bytes = request.body.len()
    ))]
    pub async fn ingest(&self, request: UploadRequest) -> Result<StorageObject, IngestError> {
        let UploadRequest {
            content_type,
            extension,
            kind,
            title,
            description,
            body,
        } = request;

        let (data, duration) = match kind {
            UploadKind::Image => (body, None),
            UploadKind::Video { declared_duration } => {
                let _permit = self.video_permits.acquire().await.map_err(|_| {
                    ProcessingError::Internal("transcode limiter closed".to_string())
                })?;

                let real_duration = self.probe.probe(&body).await?;
                if !within_tolerance(real_duration, declared_duration, self.tolerance_secs) {
                    tracing::debug!(
                        real_duration,
                        declared_duration,
                        tolerance_secs = self.tolerance_secs,
                        "Declared video duration rejected"
                    );
                    return Err(ValidationError::DurationMismatch { real_duration }.into());
                }

                let transcoded = self.transcoder.transcode(body, &extension).await?;
                (transcoded, Some(real_duration))
            }
        };

        let asset = MediaAsset {
            id: Uuid::new_v4(),
            extension,
            content_type,
            data,
            metadata: AssetMetadata {
                media_type: kind.media_type(),
                title,
                description,
                duration,
            },
        };

        self.store(asset).await
    }

    async fn store(&self, asset: MediaAsset) -> Result<StorageObject, IngestError> {
        let filename = asset.filename();
        let key = generate_storage_key(&filename);
        let size = asset.data.len();

        let url = self
            .storage
            .put_object(
                &key,
                asset.data,
                &asset.content_type,
                &asset.metadata.to_object_metadata(),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %key, "Storage write failed");
                ProcessingError::Storage(e.to_string())
            })?;

        tracing::info!(
            key = %key,
            size_bytes = size,
            media_type = %asset.metadata.media_type,
            "Upload stored"
        );

        Ok(StorageObject {
            key,
            filename,
            url,
            size,
        })
    }
}
