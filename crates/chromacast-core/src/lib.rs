//! Chromacast Core Library
//!
//! This crate provides the domain models (assets, transformation pipelines,
//! composition descriptors), error types and configuration shared by the
//! media cloud client and the HTTP API.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, CleanupFailurePolicy, CloudinaryConfig, CompositionConfig, Config};
pub use error::{AppError, ErrorMetadata, LogLevel, UpstreamError};
