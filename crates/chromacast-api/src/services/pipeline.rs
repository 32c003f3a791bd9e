//! Overlay transformation pipeline
//!
//! Builds the six-step chroma-key overlay applied to the background upload.

use chromacast_core::models::{
    CropMode, Dimension, Flag, TransformParam, TransformationPipeline, TransformationStep,
};
use chromacast_core::CompositionConfig;

/// Layer reference for an uploaded video asset
pub fn video_layer(public_id: &str) -> String {
    format!("video:{}", public_id)
}

/// Build the overlay pipeline for a foreground asset.
///
/// Steps, in order: scale the base, declare the overlay, scale the overlay
/// relative to the base, key out `chroma_key`, apply the layer at the
/// configured gravity, trim to the output duration.
pub fn build_overlay_pipeline(
    foreground_id: &str,
    chroma_key: &str,
    config: &CompositionConfig,
) -> TransformationPipeline {
    TransformationPipeline::new(vec![
        TransformationStep::new()
            .with(TransformParam::Width(Dimension::Pixels(config.target_width)))
            .with(TransformParam::Crop(CropMode::Scale)),
        TransformationStep::new().with(TransformParam::Overlay(video_layer(foreground_id))),
        TransformationStep::new()
            .with(TransformParam::Flags(Flag::Relative))
            .with(TransformParam::Width(Dimension::Ratio(config.overlay_scale)))
            .with(TransformParam::Crop(CropMode::Scale)),
        TransformationStep::new()
            .with(TransformParam::Color(chroma_key.to_string()))
            .with(TransformParam::MakeTransparent {
                tolerance: config.transparency_tolerance,
            }),
        TransformationStep::new()
            .with(TransformParam::Flags(Flag::LayerApply))
            .with(TransformParam::Gravity(config.gravity)),
        TransformationStep::new().with(TransformParam::Duration(config.output_duration_secs)),
    ])
}
