//! Video transcoder - re-encodes uploads into a bounded-bitrate, widely playable form

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use mediagate_core::{Config, ProcessingError};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::scratch::ScratchSpace;
use crate::tools::validate_executable_path;

/// Re-encodes a video payload.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// `extension` is the upload's container hint (the content-type subtype).
    async fn transcode(&self, data: Bytes, extension: &str) -> Result<Bytes, ProcessingError>;
}

/// Encoder settings passed to ffmpeg.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeSettings {
    pub video_codec: String,
    pub crf: u8,
    pub preset: String,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            crf: 30,
            preset: "veryfast".to_string(),
        }
    }
}

impl TranscodeSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            video_codec: config.transcode_video_codec().to_string(),
            crf: config.transcode_crf(),
            preset: config.transcode_preset().to_string(),
        }
    }

    /// ffmpeg arguments for one input/output pair. The output is always overwritten.
    pub fn build_args(&self, input_path: &Path, output_path: &Path) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
        ];
        args.extend_from_slice(&["-i".to_string(), input_path.to_string_lossy().to_string()]);
        args.extend_from_slice(&["-c:v".to_string(), self.video_codec.clone()]);
        args.extend_from_slice(&["-crf".to_string(), self.crf.to_string()]);
        args.extend_from_slice(&["-preset".to_string(), self.preset.clone()]);
        args.push(output_path.to_string_lossy().to_string());
        args
    }
}

/// Scratch file suffix for an upload extension.
///
/// Some MIME subtypes are not container extensions ffmpeg recognises; those are
/// mapped to the extension of the container they name.
pub fn scratch_suffix(extension: &str) -> String {
    let container = match extension {
        "quicktime" => "mov",
        "x-matroska" => "mkv",
        "x-msvideo" => "avi",
        "x-m4v" => "m4v",
        other => other,
    };
    format!(".{}", container)
}

/// [`Transcoder`] backed by the ffmpeg executable.
pub struct FfmpegTranscoder {
    ffmpeg_path: String,
    settings: TranscodeSettings,
    scratch: ScratchSpace,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: String, settings: TranscodeSettings, scratch: ScratchSpace) -> Result<Self> {
        validate_executable_path(&ffmpeg_path).context("Invalid ffmpeg_path")?;
        Ok(Self {
            ffmpeg_path,
            settings,
            scratch,
        })
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "transcode",
        ffmpeg.codec = %self.settings.video_codec
    ))]
    async fn run_ffmpeg(&self, input_path: &Path, output_path: &Path) -> Result<()> {
        let start = std::time::Instant::now();
        let args = self.settings.build_args(input_path, output_path);

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to execute ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "FFmpeg transcode failed ({}): {}",
                output.status,
                stderr.trim()
            ));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            "Video transcode completed"
        );

        Ok(())
    }

    async fn transcode_inner(&self, data: &[u8], extension: &str) -> Result<Bytes> {
        let suffix = scratch_suffix(extension);
        let input = self
            .scratch
            .write("transcode-in-", &suffix, data)
            .await
            .context("Failed to write transcode input")?;
        let output = self
            .scratch
            .create("transcode-out-", &suffix)
            .context("Failed to create transcode output")?;

        self.run_ffmpeg(input.path(), output.path()).await?;

        let output_data = tokio::fs::read(output.path())
            .await
            .context("Failed to read transcode output")?;
        if output_data.is_empty() {
            return Err(anyhow!("FFmpeg produced an empty output"));
        }

        tracing::debug!(
            input_bytes = data.len(),
            output_bytes = output_data.len(),
            "Transcode output read"
        );

        Ok(Bytes::from(output_data))
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, data: Bytes, extension: &str) -> Result<Bytes, ProcessingError> {
        self.transcode_inner(&data, extension).await.map_err(|e| {
            tracing::error!(error = %format!("{:#}", e), extension = %extension, "Video transcode failed");
            ProcessingError::TranscodeFailed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_build_args() {
        let args = TranscodeSettings::default().build_args(
            &PathBuf::from("/tmp/in.mp4"),
            &PathBuf::from("/tmp/out.mp4"),
        );
        assert_eq!(
            args,
            vec![
                "-y",
                "-hide_banner",
                "-nostdin",
                "-i",
                "/tmp/in.mp4",
                "-c:v",
                "libx264",
                "-crf",
                "30",
                "-preset",
                "veryfast",
                "/tmp/out.mp4",
            ]
        );
    }

    #[test]
    fn test_scratch_suffix() {
        assert_eq!(scratch_suffix("mp4"), ".mp4");
        assert_eq!(scratch_suffix("webm"), ".webm");
        assert_eq!(scratch_suffix("quicktime"), ".mov");
        assert_eq!(scratch_suffix("x-matroska"), ".mkv");
        assert_eq!(scratch_suffix("x-msvideo"), ".avi");
    }
}
