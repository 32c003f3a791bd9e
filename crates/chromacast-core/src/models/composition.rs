use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

use super::asset::MediaAsset;

/// Input of one overlay composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRequest {
    /// Clip recorded against a solid background colour
    pub foreground_path: String,
    /// Solid background colour of the foreground clip, `#RRGGBB`
    pub foreground_chroma_key: String,
    pub background_path: String,
}

/// Stages of the composition workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CompositionStage {
    UploadForeground,
    BuildPipeline,
    UploadBackground,
    CleanupForeground,
}

impl CompositionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositionStage::UploadForeground => "upload_foreground",
            CompositionStage::BuildPipeline => "build_pipeline",
            CompositionStage::UploadBackground => "upload_background",
            CompositionStage::CleanupForeground => "cleanup_foreground",
        }
    }
}

impl Display for CompositionStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Composited asset returned to the client.
///
/// Serialises as the asset itself, with a `warnings` array appended only when
/// the cleanup stage reported a non-fatal problem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct CompositionResult {
    #[serde(flatten)]
    pub asset: MediaAsset,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl CompositionResult {
    pub fn new(asset: MediaAsset) -> Self {
        Self {
            asset,
            warnings: Vec::new(),
        }
    }
}
