//! Route paths served by the API.

pub const UPLOAD_PATH: &str = "/api/upload";
pub const HEALTH_PATH: &str = "/health";
pub const OPENAPI_PATH: &str = "/api/openapi.json";
