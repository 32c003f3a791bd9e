//! Tracing initialization
//!
//! Human-readable output by default, JSON lines when `LOG_FORMAT=json`.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry, LogFormat};
