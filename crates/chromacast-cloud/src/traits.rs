//! Media cloud abstraction trait
//!
//! This module defines the capability set the service needs from the hosted
//! media cloud: upload, delete and list. Every provider reports failures as an
//! [`UpstreamError`].

use async_trait::async_trait;
use chromacast_core::models::{DeleteConfirmation, MediaAsset, TransformationPipeline};
use chromacast_core::UpstreamError;

/// Result type for media cloud operations
pub type CloudResult<T> = Result<T, UpstreamError>;

/// Options attached to an upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadOptions {
    /// Group the asset under the provider's managed folder
    pub folder: bool,
    /// Transformation applied by the provider before the asset is stored
    pub transformation: Option<TransformationPipeline>,
}

impl UploadOptions {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn in_folder(transformation: Option<TransformationPipeline>) -> Self {
        Self {
            folder: true,
            transformation,
        }
    }
}

/// Media cloud abstraction trait
///
/// Implementations talk to a hosted media service. The composition workflow
/// only depends on this trait, so it can be exercised against an in-memory
/// implementation.
#[async_trait]
pub trait MediaCloud: Send + Sync {
    /// Upload a video from a local path or a remote URL.
    ///
    /// Returns the asset descriptor assigned by the provider, including the
    /// public id later calls refer to.
    async fn upload(&self, source: &str, options: &UploadOptions) -> CloudResult<MediaAsset>;

    /// Delete assets by public id
    async fn delete(&self, public_ids: &[String]) -> CloudResult<DeleteConfirmation>;

    /// List uploaded video assets, in the provider's order
    async fn list(&self) -> CloudResult<Vec<MediaAsset>>;

    /// Provider name used in logs
    fn provider_name(&self) -> &'static str;
}
