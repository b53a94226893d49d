//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Validation and processing errors convert
//! into it with `?`, and it renders status, JSON body and log line from the error's
//! [`ErrorMetadata`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mediagate_core::{ErrorMetadata, IngestError, LogLevel, ProcessingError, ValidationError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Measured duration in seconds, present on a duration mismatch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_duration: Option<f64>,
}

/// Wrapper type for IngestError to implement IntoResponse
///
/// Needed because of the orphan rule: IntoResponse and IngestError both live in
/// other crates.
#[derive(Debug)]
pub struct HttpAppError(pub IngestError);

impl From<IngestError> for HttpAppError {
    fn from(err: IngestError) -> Self {
        HttpAppError(err)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        HttpAppError(err.into())
    }
}

fn log_error(error: &IngestError) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, code = code, "Upload rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, code = code, "Upload rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, code = code, "Upload failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let error = &self.0;

        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(error);

        let body = Json(ErrorResponse {
            error: error.client_message(),
            code: error.error_code().to_string(),
            real_duration: error.real_duration(),
        });

        (status, body).into_response()
    }
}
