//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use chromacast_core::Config;
use chromacast_infra::LogFormat;
use std::sync::Arc;

/// Validate configuration, start tracing and build the router
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    validation::validate_config(&config).context("Configuration validation failed")?;

    chromacast_infra::init_telemetry("chromacast-api", config.environment(), LogFormat::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let cloud = chromacast_cloud::create_media_cloud(&config)?;
    let state = Arc::new(AppState::new(&config, cloud));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
