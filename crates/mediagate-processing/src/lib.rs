//! Mediagate Processing Library
//!
//! Video inspection and re-encoding through ffprobe/ffmpeg, the duration tolerance
//! check, and the ingestion pipeline that ties them to a storage backend.

pub mod pipeline;
pub mod probe;
pub mod scratch;
pub mod tolerance;
pub mod transcode;
mod tools;

pub use pipeline::IngestionPipeline;
pub use probe::{parse_probe_output, DurationProbe, FfprobeDurationProbe};
pub use scratch::ScratchSpace;
pub use tolerance::within_tolerance;
pub use transcode::{scratch_suffix, FfmpegTranscoder, TranscodeSettings, Transcoder};
