//! Application-wide constants.

/// Request header carrying the declared media type (`image` or `video`).
pub const HEADER_MEDIA_TYPE: &str = "x-type";
/// Request header carrying the optional asset title.
pub const HEADER_TITLE: &str = "x-title";
/// Request header carrying the optional asset description.
pub const HEADER_DESCRIPTION: &str = "x-description";
/// Request header carrying the client-declared video duration in seconds.
pub const HEADER_VIDEO_DURATION: &str = "x-video-duration";

/// Content type assumed when the request carries none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extension used when the content-type subtype yields nothing usable.
pub const FALLBACK_EXTENSION: &str = "bin";

/// Prefix under which every uploaded object is stored.
pub const UPLOADS_PREFIX: &str = "uploads";

/// Maximum absolute difference, in seconds, between the declared and the measured
/// video duration.
pub const DEFAULT_DURATION_TOLERANCE_SECS: f64 = 0.2;

// Object metadata keys
pub const METADATA_TYPE: &str = "type";
pub const METADATA_TITLE: &str = "title";
pub const METADATA_DESCRIPTION: &str = "description";
pub const METADATA_DURATION: &str = "duration";
