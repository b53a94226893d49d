//! Error types module
//!
//! Every failure of the ingestion pipeline is either a [`ValidationError`] (the caller sent
//! inconsistent or incomplete data and can fix it) or a [`ProcessingError`] (an external
//! capability such as ffprobe, ffmpeg or the object store failed). Both are unified under
//! [`IngestError`], which self-describes its HTTP presentation through [`ErrorMetadata`].

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DURATION_MISMATCH")
    fn error_code(&self) -> &'static str;

    /// Whether the caller can fix the request and try again
    fn is_recoverable(&self) -> bool;

    /// Client-facing message
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Caller-supplied data is self-inconsistent or incomplete.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unspecified type")]
    UnspecifiedType,

    #[error("Missing video duration")]
    MissingDuration,

    #[error("Invalid video duration: {0}")]
    InvalidDuration(String),

    #[error("Empty file")]
    EmptyFile,

    #[error("Video duration mismatch")]
    DurationMismatch { real_duration: f64 },
}

/// An external capability failed while handling the upload.
///
/// Messages stay short. The low-level diagnostics (ffmpeg stderr, object
/// store errors) are logged where they occur.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProcessingError {
    #[error("duration probe failed")]
    ProbeFailed,

    #[error("transcode failed")]
    TranscodeFailed,

    #[error("storage write failed: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl IngestError {
    /// Measured duration to hand back to the caller, if this is a duration mismatch.
    pub fn real_duration(&self) -> Option<f64> {
        match self {
            IngestError::Validation(ValidationError::DurationMismatch { real_duration }) => {
                Some(*real_duration)
            }
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, IngestError::Validation(_))
    }

    /// Get the error type name for logs
    pub fn error_type(&self) -> &'static str {
        match self {
            IngestError::Validation(_) => "ValidationError",
            IngestError::Processing(_) => "ProcessingError",
        }
    }
}

impl ErrorMetadata for IngestError {
    fn http_status_code(&self) -> u16 {
        match self {
            IngestError::Validation(_) => 400,
            IngestError::Processing(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            IngestError::Validation(err) => match err {
                ValidationError::UnspecifiedType => "UNSPECIFIED_TYPE",
                ValidationError::MissingDuration => "MISSING_DURATION",
                ValidationError::InvalidDuration(_) => "INVALID_DURATION",
                ValidationError::EmptyFile => "EMPTY_FILE",
                ValidationError::DurationMismatch { .. } => "DURATION_MISMATCH",
            },
            IngestError::Processing(err) => match err {
                ProcessingError::ProbeFailed => "PROBE_FAILED",
                ProcessingError::TranscodeFailed => "TRANSCODE_FAILED",
                ProcessingError::Storage(_) => "STORAGE_ERROR",
                ProcessingError::Internal(_) => "INTERNAL_ERROR",
            },
        }
    }

    fn is_recoverable(&self) -> bool {
        self.is_validation()
    }

    fn client_message(&self) -> String {
        self.to_string()
    }

    fn log_level(&self) -> LogLevel {
        match self {
            IngestError::Validation(_) => LogLevel::Debug,
            IngestError::Processing(_) => LogLevel::Error,
        }
    }
}
