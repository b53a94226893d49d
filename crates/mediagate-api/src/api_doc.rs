//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use crate::handlers::health::HealthResponse;
use mediagate_core::models::{MediaType, UploadResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mediagate API",
        version = "0.1.0",
        description = "Media ingestion service. Uploads are classified by the X-Type header; videos have their declared duration checked against the measured one and are re-encoded before they are stored."
    ),
    paths(
        handlers::upload::upload_media,
        handlers::health::health_check,
    ),
    components(schemas(UploadResponse, ErrorResponse, HealthResponse, MediaType)),
    tags(
        (name = "upload", description = "Media ingestion"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
