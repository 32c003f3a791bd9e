//! Test helpers: build the router over an in-memory media cloud.
//!
//! Run from workspace root: `cargo test -p chromacast-api`.

use axum_test::TestServer;
use chromacast_api::setup::routes;
use chromacast_api::state::AppState;
use chromacast_cloud::{create_media_cloud, MockMediaCloud};
use chromacast_core::{CleanupFailurePolicy, Config};
use std::collections::HashMap;
use std::sync::Arc;

/// Test application: server plus the mock it talks to.
pub struct TestApp {
    pub server: TestServer,
    pub cloud: MockMediaCloud,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(policy: CleanupFailurePolicy) -> Config {
    test_config_with(policy, &[])
}

/// Test configuration with extra variables layered over the defaults
pub fn test_config_with(policy: CleanupFailurePolicy, vars: &[(&str, &str)]) -> Config {
    let mut env: HashMap<&str, &str> = [
        ("CLOUDINARY_CLOUD_NAME", "demo"),
        ("CLOUDINARY_API_KEY", "key"),
        ("CLOUDINARY_API_SECRET", "secret"),
        ("UPSTREAM_TIMEOUT_SECS", "5"),
    ]
    .into_iter()
    .collect();
    env.extend(vars.iter().copied());
    let mut config = Config::from_lookup(|key| env.get(key).map(|v| v.to_string()))
        .expect("test config");
    config.composition.cleanup_failure_policy = policy;
    config
}

/// Server backed by the real Cloudinary client, for tests against a fake HTTP API
pub fn setup_cloudinary_server(api_base: &str) -> TestServer {
    let config = test_config_with(
        CleanupFailurePolicy::Fatal,
        &[("CLOUDINARY_API_BASE", api_base)],
    );
    let cloud = create_media_cloud(&config).expect("cloudinary client");
    let state = Arc::new(AppState::new(&config, cloud));
    let router = routes::setup_routes(&config, state).expect("router");
    TestServer::new(router).expect("test server")
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(CleanupFailurePolicy::Fatal)
}

pub fn setup_test_app_with(policy: CleanupFailurePolicy) -> TestApp {
    let config = test_config(policy);
    let cloud = MockMediaCloud::new();
    let state = Arc::new(AppState::new(&config, Arc::new(cloud.clone())));
    let router = routes::setup_routes(&config, state).expect("router");
    let server = TestServer::new(router).expect("test server");
    TestApp { server, cloud }
}
