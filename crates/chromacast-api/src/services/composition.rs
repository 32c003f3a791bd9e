//! Overlay composition workflow
//!
//! Uploads the foreground clip, uploads the background clip with the overlay
//! pipeline referencing it, then deletes the foreground. Each stage is named
//! so failures report where they happened.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chromacast_cloud::{CloudResult, MediaCloud, UploadOptions};
use chromacast_core::config::is_hex_color;
use chromacast_core::models::{CompositionRequest, CompositionResult, CompositionStage, MediaAsset};
use chromacast_core::{CleanupFailurePolicy, CompositionConfig, UpstreamError};

use super::pipeline::build_overlay_pipeline;

/// Failure of one composition stage
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{stage} failed: {error}")]
pub struct CompositionError {
    pub stage: CompositionStage,
    pub error: UpstreamError,
    /// Asset left behind on the media cloud because cleanup never ran
    pub orphaned_asset: Option<String>,
}

impl CompositionError {
    fn at(stage: CompositionStage, error: UpstreamError) -> Self {
        Self {
            stage,
            error,
            orphaned_asset: None,
        }
    }

    fn orphaning(mut self, public_id: &str) -> Self {
        self.orphaned_asset = Some(public_id.to_string());
        self
    }
}

/// Runs compositions and listings against a media cloud
#[derive(Clone)]
pub struct CompositionService {
    cloud: Arc<dyn MediaCloud>,
    config: CompositionConfig,
    call_timeout: Duration,
}

impl CompositionService {
    pub fn new(cloud: Arc<dyn MediaCloud>, config: CompositionConfig, call_timeout: Duration) -> Self {
        Self {
            cloud,
            config,
            call_timeout,
        }
    }

    /// List uploaded assets exactly as the media cloud returns them
    #[tracing::instrument(skip(self), fields(provider = self.cloud.provider_name()))]
    pub async fn list_assets(&self) -> Result<Vec<MediaAsset>, UpstreamError> {
        let assets = self.bounded("list", self.cloud.list()).await?;
        tracing::debug!(count = assets.len(), "Listed assets");
        Ok(assets)
    }

    /// Compose the configured foreground over the configured background
    pub async fn compose_default(&self) -> Result<CompositionResult, CompositionError> {
        self.compose_overlay(&self.config.request()).await
    }

    #[tracing::instrument(
        skip(self, request),
        fields(
            foreground = %request.foreground_path,
            background = %request.background_path,
            provider = self.cloud.provider_name()
        )
    )]
    pub async fn compose_overlay(
        &self,
        request: &CompositionRequest,
    ) -> Result<CompositionResult, CompositionError> {
        // Checked before any upload so a bad colour never leaves an orphan
        if !is_hex_color(&request.foreground_chroma_key) {
            return Err(CompositionError::at(
                CompositionStage::BuildPipeline,
                UpstreamError::new(format!(
                    "Invalid chroma key colour '{}', expected #RRGGBB",
                    request.foreground_chroma_key
                )),
            ));
        }

        let foreground = self
            .bounded(
                "upload",
                self.cloud
                    .upload(&request.foreground_path, &UploadOptions::plain()),
            )
            .await
            .map_err(|e| CompositionError::at(CompositionStage::UploadForeground, e))?;
        let foreground_id = foreground.public_id;
        tracing::info!(public_id = %foreground_id, "Foreground uploaded");

        let pipeline =
            build_overlay_pipeline(&foreground_id, &request.foreground_chroma_key, &self.config);
        tracing::debug!(transformation = %pipeline, "Overlay pipeline built");

        let composed = match self
            .bounded(
                "upload",
                self.cloud.upload(
                    &request.background_path,
                    &UploadOptions::in_folder(Some(pipeline)),
                ),
            )
            .await
        {
            Ok(asset) => asset,
            Err(e) => {
                // The foreground is not cleaned up here
                tracing::warn!(
                    orphaned_asset = %foreground_id,
                    error = %e,
                    "Background upload failed, foreground asset left on the media cloud"
                );
                return Err(CompositionError::at(CompositionStage::UploadBackground, e)
                    .orphaning(&foreground_id));
            }
        };
        tracing::info!(public_id = %composed.public_id, "Composed asset uploaded");
        if !composed.is_in_folder() {
            tracing::warn!(
                public_id = %composed.public_id,
                "Composed asset was not stored in the managed folder"
            );
        }

        let mut result = CompositionResult::new(composed);
        let ids = [foreground_id.clone()];
        match self.bounded("delete", self.cloud.delete(&ids)).await {
            Ok(confirmation) => {
                if !confirmation.was_deleted(&foreground_id) {
                    tracing::warn!(
                        public_id = %foreground_id,
                        "Delete did not confirm foreground removal"
                    );
                }
            }
            Err(e) => match self.config.cleanup_failure_policy {
                CleanupFailurePolicy::Fatal => {
                    return Err(CompositionError::at(CompositionStage::CleanupForeground, e)
                        .orphaning(&foreground_id));
                }
                CleanupFailurePolicy::Warn => {
                    tracing::warn!(
                        orphaned_asset = %foreground_id,
                        error = %e,
                        "Foreground cleanup failed, returning composed asset"
                    );
                    result.warnings.push(format!(
                        "Failed to delete foreground asset {}: {}",
                        foreground_id, e
                    ));
                }
            },
        }

        Ok(result)
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> CloudResult<T>
    where
        F: Future<Output = CloudResult<T>>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_secs = self.call_timeout.as_secs_f64(),
                    "Media cloud call timed out"
                );
                Err(UpstreamError::new(format!(
                    "Media cloud {} timed out after {:?}",
                    operation, self.call_timeout
                )))
            }
        }
    }
}
