//! Configuration validation
//!
//! Runs at startup so misconfiguration fails before the listener binds.

use anyhow::Result;
use chromacast_core::Config;
use std::path::Path;

/// Validate configuration values and warn about suspicious ones
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();
    let env_var = std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .ok();
    if is_production && env_var.is_none() {
        tracing::warn!(
            "Production mode detected but ENVIRONMENT/APP_ENV not set - error details may leak"
        );
    }

    // Local sources that are missing only fail at request time, so surface them now
    for path in [
        &config.composition.foreground_path,
        &config.composition.background_path,
    ] {
        if !is_remote(path) && !Path::new(path).exists() {
            tracing::warn!(path = %path, "Configured source video not found");
        }
    }

    if config.cloudinary.timeout.as_secs() > 600 {
        tracing::warn!(
            timeout_secs = config.cloudinary.timeout.as_secs(),
            "UPSTREAM_TIMEOUT_SECS is very high; slow uploads will hold requests open"
        );
    }

    Ok(())
}

fn is_remote(source: &str) -> bool {
    let lower = source.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
