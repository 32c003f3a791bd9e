//! Chromacast Infrastructure Library
//!
//! Shared infrastructure components used by the Chromacast services:
//! - Middleware (request ID)
//! - Telemetry initialization
//! - Error response body

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{request_id_middleware, REQUEST_ID_HEADER};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};

pub use error::ErrorResponse;
