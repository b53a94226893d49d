//! Duration probe - measures the true playback duration of a video container

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use mediagate_core::ProcessingError;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::scratch::ScratchSpace;
use crate::tools::validate_executable_path;

/// Measures the duration of a video payload, independent of any caller claim.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    /// Duration in seconds, or [`ProcessingError::ProbeFailed`].
    async fn probe(&self, data: &Bytes) -> Result<f64, ProcessingError>;
}

/// [`DurationProbe`] backed by the ffprobe executable.
pub struct FfprobeDurationProbe {
    ffprobe_path: String,
    scratch: ScratchSpace,
}

impl FfprobeDurationProbe {
    pub fn new(ffprobe_path: String, scratch: ScratchSpace) -> Result<Self> {
        validate_executable_path(&ffprobe_path).context("Invalid ffprobe_path")?;
        Ok(Self {
            ffprobe_path,
            scratch,
        })
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe_path(&self, video_path: &Path) -> Result<f64> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(video_path)
            .stdin(Stdio::null())
            .output()
            .await
            .context("Failed to execute ffprobe")?;

        if !output.status.success() {
            return Err(anyhow!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let duration = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            video_duration = duration,
            "Video probe completed"
        );

        Ok(duration)
    }
}

#[async_trait]
impl DurationProbe for FfprobeDurationProbe {
    async fn probe(&self, data: &Bytes) -> Result<f64, ProcessingError> {
        // The container is sniffed from content; the suffix is only a hint.
        let input = self.scratch.write("probe-", ".mp4", data).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to write probe scratch file");
            ProcessingError::ProbeFailed
        })?;

        self.probe_path(input.path()).await.map_err(|e| {
            tracing::error!(error = %format!("{:#}", e), "Duration probe failed");
            ProcessingError::ProbeFailed
        })
    }
}

/// Extract `format.duration` from ffprobe's JSON output.
///
/// ffprobe reports the duration as a decimal string; a bare number is accepted too.
pub fn parse_probe_output(stdout: &[u8]) -> Result<f64> {
    let probe_data: serde_json::Value =
        serde_json::from_slice(stdout).context("Failed to parse ffprobe output")?;

    let duration = &probe_data["format"]["duration"];
    let duration = duration
        .as_str()
        .and_then(|d| d.trim().parse::<f64>().ok())
        .or_else(|| duration.as_f64())
        .ok_or_else(|| anyhow!("Could not parse duration"))?;

    if !duration.is_finite() || duration < 0.0 {
        return Err(anyhow!("Implausible duration: {}", duration));
    }

    Ok(duration)
}
