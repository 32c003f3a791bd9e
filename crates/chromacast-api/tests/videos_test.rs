//! HTTP tests for `/videos`.

mod helpers;

use chromacast_core::models::MediaAsset;
use chromacast_core::{CleanupFailurePolicy, UpstreamError};
use helpers::{setup_cloudinary_server, setup_test_app, setup_test_app_with};
use serde_json::json;

#[tokio::test]
async fn test_list_videos_returns_result_envelope() {
    let app = setup_test_app();
    let mut first = MediaAsset::new("videos/b");
    first.duration = Some(15.0);
    app.cloud
        .set_listing(Ok(vec![first, MediaAsset::new("videos/a")]));

    let response = app.client().get("/videos").await;

    assert_eq!(response.status_code(), 200);
    let data: serde_json::Value = response.json();
    let result = data["result"].as_array().unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result[0]["public_id"], "videos/b");
    assert_eq!(result[0]["duration"], 15.0);
    assert_eq!(result[1]["public_id"], "videos/a");
}

#[tokio::test]
async fn test_list_videos_empty() {
    let app = setup_test_app();

    let response = app.client().get("/videos").await;

    assert_eq!(response.status_code(), 200);
    let data: serde_json::Value = response.json();
    assert_eq!(data, json!({"result": []}));
}

#[tokio::test]
async fn test_list_videos_passes_upstream_status() {
    let app = setup_test_app();
    app.cloud
        .set_listing(Err(UpstreamError::with_status("Invalid api_key", 401)));

    let response = app.client().get("/videos").await;

    assert_eq!(response.status_code(), 401);
    let data: serde_json::Value = response.json();
    assert_eq!(data["error"], "Invalid api_key");
    assert_eq!(data["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_list_videos_without_status_is_400() {
    let app = setup_test_app();
    app.cloud
        .set_listing(Err(UpstreamError::new("dns error: no such host")));

    let response = app.client().get("/videos").await;

    assert_eq!(response.status_code(), 400);
    let data: serde_json::Value = response.json();
    assert_eq!(data["error"], "dns error: no such host");
}

#[tokio::test]
async fn test_create_video_composes_and_cleans_up() {
    let app = setup_test_app();
    app.cloud
        .push_upload(Ok(MediaAsset::new("fg123")))
        .push_upload(Ok(MediaAsset::new("videos/composed")));

    let response = app.client().post("/videos").await;

    assert_eq!(response.status_code(), 200);
    let data: serde_json::Value = response.json();
    assert_eq!(data["result"]["public_id"], "videos/composed");
    assert!(data["result"].get("warnings").is_none());

    let uploads = app.cloud.uploads();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].0, "static/videos/foreground.mp4");
    assert_eq!(uploads[1].0, "static/videos/background.mp4");
    assert_eq!(
        uploads[1]
            .1
            .transformation
            .as_ref()
            .unwrap()
            .to_transformation_string(),
        "w_500,c_scale/l_video:fg123/fl_relative,w_0.6,c_scale/co_rgb:6adb47,e_make_transparent:20/fl_layer_apply,g_north/du_15.0"
    );
    assert_eq!(app.cloud.deletes(), vec![vec!["fg123".to_string()]]);
}

#[tokio::test]
async fn test_create_video_foreground_failure() {
    let app = setup_test_app();
    app.cloud
        .push_upload(Err(UpstreamError::with_status("Resource not found", 404)));

    let response = app.client().post("/videos").await;

    assert_eq!(response.status_code(), 404);
    let data: serde_json::Value = response.json();
    assert_eq!(data["error"], "Resource not found");
    assert_eq!(data["stage"], "upload_foreground");
    assert_eq!(app.cloud.uploads().len(), 1);
    assert!(app.cloud.deletes().is_empty());
}

#[tokio::test]
async fn test_create_video_background_failure_skips_cleanup() {
    let app = setup_test_app();
    app.cloud
        .push_upload(Ok(MediaAsset::new("fg123")))
        .push_upload(Err(UpstreamError::new("Invalid transformation")));

    let response = app.client().post("/videos").await;

    assert_eq!(response.status_code(), 400);
    let data: serde_json::Value = response.json();
    assert_eq!(data["error"], "Invalid transformation");
    assert_eq!(data["stage"], "upload_background");
    assert!(app.cloud.deletes().is_empty());
}

#[tokio::test]
async fn test_create_video_cleanup_failure_is_fatal_by_default() {
    let app = setup_test_app();
    app.cloud.push_upload(Ok(MediaAsset::new("fg123")));
    app.cloud
        .fail_delete(UpstreamError::with_status("Rate limit exceeded", 420));

    let response = app.client().post("/videos").await;

    assert_eq!(response.status_code(), 420);
    let data: serde_json::Value = response.json();
    assert_eq!(data["stage"], "cleanup_foreground");
    assert_eq!(app.cloud.deletes().len(), 1);
}

#[tokio::test]
async fn test_create_video_cleanup_failure_can_warn() {
    let app = setup_test_app_with(CleanupFailurePolicy::Warn);
    app.cloud
        .push_upload(Ok(MediaAsset::new("fg123")))
        .push_upload(Ok(MediaAsset::new("videos/composed")));
    app.cloud
        .fail_delete(UpstreamError::with_status("Rate limit exceeded", 420));

    let response = app.client().post("/videos").await;

    assert_eq!(response.status_code(), 200);
    let data: serde_json::Value = response.json();
    assert_eq!(data["result"]["public_id"], "videos/composed");
    let warnings = data["result"]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("fg123"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/videos")
        .add_header("x-request-id", "req-42")
        .await;

    assert_eq!(response.header("x-request-id"), "req-42");
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = setup_test_app();

    let health = app.client().get("/health").await;
    assert_eq!(health.status_code(), 200);
    let data: serde_json::Value = health.json();
    assert_eq!(data["status"], "healthy");
    assert_eq!(data["provider"], "mock");
    assert!(app.cloud.calls().is_empty());

    let docs = app.client().get("/api-docs/openapi.json").await;
    assert_eq!(docs.status_code(), 200);
    let spec: serde_json::Value = docs.json();
    assert!(spec["paths"]["/videos"]["post"].is_object());
}

#[tokio::test]
async fn test_list_videos_undecodable_upstream_body_is_not_success() {
    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("GET", "/v1_1/demo/resources/video/upload")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let server = setup_cloudinary_server(&upstream.url());
    let response = server.get("/videos").await;

    assert_eq!(response.status_code(), 400);
    let data: serde_json::Value = response.json();
    assert_eq!(data["code"], "UPSTREAM_ERROR");
    assert!(data.get("result").is_none());
    assert!(data.get("status_code").is_none());
}
