//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::constants::{HEALTH_PATH, OPENAPI_PATH, UPLOAD_PATH};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use mediagate_core::constants::{
    HEADER_DESCRIPTION, HEADER_MEDIA_TYPE, HEADER_TITLE, HEADER_VIDEO_DURATION,
};
use mediagate_core::Config;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    tracing::info!(
        max_upload_mb = config.max_upload_size_bytes() / 1024 / 1024,
        "Request body limit enabled"
    );

    let app = Router::new()
        .route(UPLOAD_PATH, post(handlers::upload::upload_media))
        .route(HEALTH_PATH, get(handlers::health::health_check))
        .route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
        .layer(DefaultBodyLimit::max(config.max_upload_size_bytes()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let allowed_headers = [
        CONTENT_TYPE,
        HeaderName::from_static(HEADER_MEDIA_TYPE),
        HeaderName::from_static(HEADER_TITLE),
        HeaderName::from_static(HEADER_DESCRIPTION),
        HeaderName::from_static(HEADER_VIDEO_DURATION),
    ];

    let origin = if config.cors_origins().iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {}: {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(allowed_headers))
}
