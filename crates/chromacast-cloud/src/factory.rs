#[cfg(feature = "cloudinary")]
use crate::CloudinaryClient;
use crate::MediaCloud;
use chromacast_core::Config;
use std::sync::Arc;

/// Create the media cloud client based on configuration
pub fn create_media_cloud(config: &Config) -> anyhow::Result<Arc<dyn MediaCloud>> {
    #[cfg(feature = "cloudinary")]
    {
        let client = CloudinaryClient::new(config.cloudinary.clone())?;
        tracing::info!(
            cloud_name = %config.cloudinary.cloud_name,
            folder = %config.cloudinary.folder,
            "Cloudinary media cloud initialized"
        );
        Ok(Arc::new(client))
    }

    #[cfg(not(feature = "cloudinary"))]
    {
        let _ = config;
        Err(anyhow::anyhow!(
            "No media cloud provider available (cloudinary feature not enabled)"
        ))
    }
}
