//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use chromacast_core::models;

/// The served OpenAPI document
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chromacast API",
        version = "0.1.0",
        description = "Lists uploaded videos and composites a chroma-keyed foreground clip over a background clip on a hosted media cloud."
    ),
    paths(
        handlers::videos::list_videos,
        handlers::videos::create_video,
    ),
    components(schemas(
        models::MediaAsset,
        models::CompositionResult,
        models::CompositionStage,
        handlers::videos::AssetListResponse,
        handlers::videos::CompositionResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "videos", description = "Video listing and overlay composition")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_video_operations() {
        let spec = get_openapi_spec();
        let videos = spec.paths.paths.get("/videos").unwrap();
        assert!(videos.get.is_some());
        assert!(videos.post.is_some());
    }
}
