use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{
        header::{AsHeaderName, CONTENT_TYPE},
        HeaderMap,
    },
    Json,
};
use bytes::Bytes;
use mediagate_core::constants::{
    HEADER_DESCRIPTION, HEADER_MEDIA_TYPE, HEADER_TITLE, HEADER_VIDEO_DURATION,
};
use mediagate_core::models::{UploadFields, UploadRequest, UploadResponse};
use std::sync::Arc;

/// Header value as text; values that are not visible ASCII count as absent.
fn header_str<'a>(headers: &'a HeaderMap, name: impl AsHeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "upload",
    params(
        ("X-Type" = String, Header, description = "Declared media type: 'image' or 'video'"),
        ("X-Title" = Option<String>, Header, description = "Optional title stored as object metadata"),
        ("X-Description" = Option<String>, Header, description = "Optional description stored as object metadata"),
        ("X-Video-Duration" = Option<String>, Header, description = "Declared duration in seconds; required for videos")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream", description = "Raw media bytes; Content-Type is the media MIME type"),
    responses(
        (status = 200, description = "Upload stored", body = UploadResponse),
        (status = 400, description = "Invalid request or duration mismatch", body = ErrorResponse),
        (status = 413, description = "Body exceeds the upload size limit"),
        (status = 500, description = "Probe, transcode or storage failure", body = ErrorResponse)
    )
)]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let fields = UploadFields {
        content_type: header_str(&headers, CONTENT_TYPE),
        media_type: header_str(&headers, HEADER_MEDIA_TYPE),
        title: header_str(&headers, HEADER_TITLE),
        description: header_str(&headers, HEADER_DESCRIPTION),
        video_duration: header_str(&headers, HEADER_VIDEO_DURATION),
    };

    let request = UploadRequest::parse(fields, body)?;
    let object = state.pipeline.ingest(request).await?;

    Ok(Json(object.into()))
}
