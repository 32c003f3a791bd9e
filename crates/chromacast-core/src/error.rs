//! Error types module
//!
//! Every failure talking to the media cloud is an [`UpstreamError`]; there is
//! no distinction between network, authentication and malformed-input failures
//! at this layer. [`AppError`] adds internal failures on top, and describes how
//! each should be presented over HTTP through [`ErrorMetadata`].

/// Status used when the media cloud did not provide one.
pub const DEFAULT_UPSTREAM_STATUS: u16 = 400;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Warning level - for upstream failures the caller can retry
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPSTREAM_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Failure reported by (or while reaching) the media cloud.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct UpstreamError {
    pub message: String,
    /// HTTP status returned by the media cloud, when it answered at all
    pub status_code: Option<u16>,
}

impl UpstreamError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Status to surface to our own clients: the upstream one, or 400.
    ///
    /// Only 4xx and 5xx statuses are passed through, so a failure is never
    /// reported with a success status.
    pub fn response_status(&self) -> u16 {
        self.status_code
            .filter(|status| (400..=599).contains(status))
            .unwrap_or(DEFAULT_UPSTREAM_STATUS)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Upstream(_) => "Upstream",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Upstream status code carried by the error, if any
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::Upstream(e) => e.status_code,
            AppError::InternalWithSource { .. } => None,
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::Upstream(e) => e.response_status(),
            AppError::InternalWithSource { .. } => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::InternalWithSource { .. } => "INTERNAL_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Upstream(e) => e.message.clone(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        matches!(self, AppError::InternalWithSource { .. })
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::Upstream(_) => LogLevel::Warn,
            AppError::InternalWithSource { .. } => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_passthrough() {
        let err = AppError::from(UpstreamError::with_status("Invalid api_key", 401));
        assert_eq!(err.http_status_code(), 401);
        assert_eq!(err.error_code(), "UPSTREAM_ERROR");
        assert_eq!(err.client_message(), "Invalid api_key");
        assert_eq!(err.upstream_status(), Some(401));
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_upstream_without_status_defaults_to_400() {
        let err = AppError::from(UpstreamError::new("connection reset"));
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.upstream_status(), None);
    }

    #[test]
    fn test_internal_is_sensitive() {
        let err = AppError::from(anyhow::anyhow!("boom"));
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
        assert_eq!(err.error_type(), "Internal");
    }

    #[test]
    fn test_detailed_message_walks_source_chain() {
        let err = AppError::from(anyhow::anyhow!("disk full").context("writing cache"));
        let details = err.detailed_message();
        assert!(details.starts_with("Internal error with source"));
        assert!(details.contains("Caused by: writing cache"));
    }

    #[test]
    fn test_success_status_never_passed_through() {
        let err = AppError::from(UpstreamError::with_status("bad body", 200));
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(UpstreamError::with_status("moved", 302).response_status(), 400);
        assert_eq!(UpstreamError::with_status("down", 503).response_status(), 503);
    }
}
