//! HTTP error response body
//!
//! Note: IntoResponse for AppError lives in the binary crate (chromacast-api)
//! because of the orphan rule.

use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response format for HTTP APIs
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    /// Status reported by the media cloud, when the failure came from it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Workflow stage that failed, for composition errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            status_code: None,
            stage: None,
            details: None,
            error_type: None,
        }
    }
}
