//! Health check handler.

use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// Liveness probe. Does not call the media cloud.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "provider": state.provider,
        "environment": state.environment,
    }))
}
