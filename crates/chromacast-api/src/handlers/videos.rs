//! Video listing and overlay composition handlers

use axum::{extract::State, response::IntoResponse, Json};
use chromacast_core::models::{CompositionResult, MediaAsset};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct AssetListResponse {
    pub result: Vec<MediaAsset>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompositionResponse {
    pub result: CompositionResult,
}

#[utoipa::path(
    get,
    path = "/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Uploaded video assets, in the media cloud's order", body = AssetListResponse),
        (status = 400, description = "Media cloud failure without a status code", body = ErrorResponse),
        (status = "default", description = "Media cloud failure, status passed through", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let assets = state.composition.list_assets().await?;
    Ok(Json(AssetListResponse { result: assets }))
}

#[utoipa::path(
    post,
    path = "/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Background video composited with the keyed foreground", body = CompositionResponse),
        (status = 400, description = "Media cloud failure without a status code", body = ErrorResponse),
        (status = "default", description = "Media cloud failure, status passed through", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "create_video"))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let composed = state.composition.compose_default().await?;
    tracing::info!(
        public_id = %composed.asset.public_id,
        warnings = composed.warnings.len(),
        "Composition completed"
    );
    Ok(Json(CompositionResponse { result: composed }))
}
