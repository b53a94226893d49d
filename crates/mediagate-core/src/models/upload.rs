//! Typed upload requests.
//!
//! The transport hands over a handful of optional string fields plus the raw body.
//! [`UploadRequest::parse`] turns them into a fully typed request or a
//! [`ValidationError`]; nothing partially parsed reaches the pipeline.

use bytes::Bytes;

use super::media::MediaType;
use crate::constants::{DEFAULT_CONTENT_TYPE, FALLBACK_EXTENSION};
use crate::error::ValidationError;

/// Raw, untrusted request fields as received from the transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadFields<'a> {
    pub content_type: Option<&'a str>,
    pub media_type: Option<&'a str>,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub video_duration: Option<&'a str>,
}

/// What kind of asset is being uploaded, with the data only that kind carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UploadKind {
    Image,
    Video { declared_duration: f64 },
}

impl UploadKind {
    pub fn media_type(&self) -> MediaType {
        match self {
            UploadKind::Image => MediaType::Image,
            UploadKind::Video { .. } => MediaType::Video,
        }
    }
}

/// A validated upload, ready for the ingestion pipeline.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub content_type: String,
    pub extension: String,
    pub kind: UploadKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Bytes,
}

impl UploadRequest {
    /// Parse raw transport fields into a typed request.
    ///
    /// Checks run in this order: declared type, body, declared duration.
    pub fn parse(fields: UploadFields<'_>, body: Bytes) -> Result<Self, ValidationError> {
        let media_type: MediaType = fields
            .media_type
            .ok_or(ValidationError::UnspecifiedType)?
            .parse()?;

        if body.is_empty() {
            return Err(ValidationError::EmptyFile);
        }

        let kind = match media_type {
            MediaType::Image => UploadKind::Image,
            MediaType::Video => {
                let raw = fields
                    .video_duration
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(ValidationError::MissingDuration)?;
                UploadKind::Video {
                    declared_duration: parse_duration(raw)?,
                }
            }
        };

        let content_type = fields
            .content_type
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let extension = extension_from_content_type(&content_type);

        Ok(UploadRequest {
            content_type,
            extension,
            kind,
            title: non_empty(fields.title),
            description: non_empty(fields.description),
            body,
        })
    }

    pub fn media_type(&self) -> MediaType {
        self.kind.media_type()
    }
}

fn parse_duration(raw: &str) -> Result<f64, ValidationError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ValidationError::InvalidDuration(raw.to_string())),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Derive the file extension from a MIME type: the subtype, lowercased, without
/// parameters, restricted to characters that are safe in a storage key.
pub fn extension_from_content_type(content_type: &str) -> String {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    let subtype = essence.rsplit('/').next().unwrap_or_default();

    let cleaned: String = subtype
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        .collect::<String>()
        .to_ascii_lowercase();
    let cleaned = cleaned.trim_matches('.');

    if cleaned.is_empty() {
        FALLBACK_EXTENSION.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_fields<'a>(duration: Option<&'a str>) -> UploadFields<'a> {
        UploadFields {
            content_type: Some("video/mp4"),
            media_type: Some("video"),
            video_duration: duration,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_image_request() {
        let fields = UploadFields {
            content_type: Some("image/png"),
            media_type: Some("image"),
            title: Some("  Sunset "),
            description: Some(""),
            video_duration: Some("ignored"),
        };
        let req = UploadRequest::parse(fields, Bytes::from_static(b"\x89PNG")).unwrap();

        assert_eq!(req.kind, UploadKind::Image);
        assert_eq!(req.extension, "png");
        assert_eq!(req.content_type, "image/png");
        assert_eq!(req.title.as_deref(), Some("Sunset"));
        assert_eq!(req.description, None);
    }

    #[test]
    fn test_parse_video_request() {
        let req = UploadRequest::parse(video_fields(Some("10.0")), Bytes::from_static(b"data"))
            .unwrap();
        assert_eq!(
            req.kind,
            UploadKind::Video {
                declared_duration: 10.0
            }
        );
        assert_eq!(req.media_type(), MediaType::Video);
    }

    #[test]
    fn test_missing_or_unknown_type_is_rejected() {
        let body = Bytes::from_static(b"anything");
        let missing = UploadFields {
            content_type: Some("image/png"),
            ..Default::default()
        };
        assert_eq!(
            UploadRequest::parse(missing, body.clone()).unwrap_err(),
            ValidationError::UnspecifiedType
        );

        for value in ["audio", "Image", "VIDEO", ""] {
            let fields = UploadFields {
                media_type: Some(value),
                ..Default::default()
            };
            assert_eq!(
                UploadRequest::parse(fields, body.clone()).unwrap_err(),
                ValidationError::UnspecifiedType,
                "value {value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_type_is_checked_before_body() {
        let err = UploadRequest::parse(UploadFields::default(), Bytes::new()).unwrap_err();
        assert_eq!(err, ValidationError::UnspecifiedType);
    }

    #[test]
    fn test_empty_body_is_rejected() {
        let err = UploadRequest::parse(video_fields(Some("1.0")), Bytes::new()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyFile);
    }

    #[test]
    fn test_video_duration_validation() {
        let body = Bytes::from_static(b"data");
        assert_eq!(
            UploadRequest::parse(video_fields(None), body.clone()).unwrap_err(),
            ValidationError::MissingDuration
        );
        assert_eq!(
            UploadRequest::parse(video_fields(Some("  ")), body.clone()).unwrap_err(),
            ValidationError::MissingDuration
        );
        for raw in ["ten", "NaN", "inf", "-1"] {
            assert_eq!(
                UploadRequest::parse(video_fields(Some(raw)), body.clone()).unwrap_err(),
                ValidationError::InvalidDuration(raw.to_string())
            );
        }
    }

    #[test]
    fn test_missing_content_type_defaults_to_octet_stream() {
        let fields = UploadFields {
            media_type: Some("image"),
            ..Default::default()
        };
        let req = UploadRequest::parse(fields, Bytes::from_static(b"x")).unwrap();
        assert_eq!(req.content_type, "application/octet-stream");
        assert_eq!(req.extension, "octet-stream");
    }

    #[test]
    fn test_extension_from_content_type() {
        assert_eq!(extension_from_content_type("video/mp4"), "mp4");
        assert_eq!(extension_from_content_type("Video/QuickTime"), "quicktime");
        assert_eq!(
            extension_from_content_type("video/webm; codecs=\"vp8, vorbis\""),
            "webm"
        );
        assert_eq!(extension_from_content_type("image/svg+xml"), "svg+xml");
        assert_eq!(extension_from_content_type("image/"), "bin");
        assert_eq!(extension_from_content_type("image/.."), "bin");
        assert_eq!(extension_from_content_type("png"), "png");
    }
}
