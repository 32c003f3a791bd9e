//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that
//! converts into [`AppError`] or [`CompositionError`] renders with the same
//! status, body and logging rules.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chromacast_core::models::CompositionStage;
use chromacast_core::{AppError, ErrorMetadata, LogLevel, UpstreamError};
pub use chromacast_infra::ErrorResponse;

use crate::services::CompositionError;

/// Wrapper around [`AppError`] so it can implement `IntoResponse`
/// (both the trait and the type are foreign to this crate).
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    /// Composition stage that failed, when the error came from the workflow
    pub stage: Option<CompositionStage>,
}

impl HttpAppError {
    pub fn new(error: AppError) -> Self {
        Self { error, stage: None }
    }
}

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError::new(err)
    }
}

impl From<UpstreamError> for HttpAppError {
    fn from(err: UpstreamError) -> Self {
        HttpAppError::new(AppError::Upstream(err))
    }
}

impl From<CompositionError> for HttpAppError {
    fn from(err: CompositionError) -> Self {
        if let Some(orphan) = &err.orphaned_asset {
            tracing::warn!(
                stage = %err.stage,
                orphaned_asset = %orphan,
                "Composition failed with an asset left on the media cloud"
            );
        }
        HttpAppError {
            error: AppError::Upstream(err.error),
            stage: Some(err.stage),
        }
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError::new(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError, stage: Option<CompositionStage>) {
    let error_type = error.error_type();
    let stage = stage.map(|s| s.as_str()).unwrap_or("none");
    match error.log_level() {
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, stage, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, stage, "Request failed");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| {
            let env = env.to_lowercase();
            env == "production" || env == "prod"
        })
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.error;
        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::BAD_REQUEST);

        log_error(app_error, self.stage);

        let mut body = ErrorResponse::new(app_error.client_message(), app_error.error_code());
        body.status_code = app_error.upstream_status();
        body.stage = self.stage.map(|s| s.as_str().to_string());
        // Error chains are only exposed outside production, and never for internal errors
        if !is_production_env() && !app_error.is_sensitive() {
            body.details = Some(app_error.detailed_message());
            body.error_type = Some(app_error.error_type().to_string());
        }

        (status, Json(body)).into_response()
    }
}
