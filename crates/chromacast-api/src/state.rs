//! Application state shared by handlers.

use chromacast_cloud::MediaCloud;
use chromacast_core::Config;
use std::sync::Arc;

use crate::services::CompositionService;

pub struct AppState {
    pub composition: CompositionService,
    /// Provider name reported by the health endpoint
    pub provider: &'static str,
    pub environment: String,
}

impl AppState {
    pub fn new(config: &Config, cloud: Arc<dyn MediaCloud>) -> Self {
        let provider = cloud.provider_name();
        Self {
            composition: CompositionService::new(
                cloud,
                config.composition.clone(),
                config.cloudinary.timeout,
            ),
            provider,
            environment: config.environment().to_string(),
        }
    }
}
