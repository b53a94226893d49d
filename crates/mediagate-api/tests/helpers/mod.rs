//! Test helpers: build AppState and router around test doubles.
//!
//! The probe and transcoder are replaced with in-process doubles and storage with a
//! recording backend, so the HTTP surface can be tested without ffmpeg or a bucket.

pub mod doubles;

use axum_test::TestServer;
use doubles::{FixedProbe, RecordingStorage, TaggingTranscoder};
use mediagate_api::setup::routes;
use mediagate_api::AppState;
use mediagate_core::{Config, IngestConfig};
use mediagate_processing::IngestionPipeline;
use std::collections::HashMap;
use std::sync::Arc;

/// Test application: server plus handles on the doubles behind it.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<RecordingStorage>,
    pub probe: Arc<FixedProbe>,
    pub transcoder: Arc<TaggingTranscoder>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn create_test_config(overrides: &[(&str, &str)]) -> Config {
    let mut env: HashMap<String, String> = [
        ("STORAGE_BACKEND", "local"),
        ("LOCAL_STORAGE_PATH", "/tmp/mediagate-test"),
        ("LOCAL_STORAGE_BASE_URL", "http://localhost:8080/media"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in overrides {
        env.insert(k.to_string(), v.to_string());
    }

    let ingest = IngestConfig::from_lookup(|key| env.get(key).cloned())
        .expect("Failed to build test config");
    Config(Box::new(ingest))
}

/// Setup a test app whose probe reports `measured` seconds (or fails when `None`).
pub fn setup_test_app(measured: Option<f64>) -> TestApp {
    setup_test_app_with(measured, &[])
}

pub fn setup_test_app_with(measured: Option<f64>, overrides: &[(&str, &str)]) -> TestApp {
    let config = create_test_config(overrides);

    let storage = Arc::new(RecordingStorage::default());
    let probe = Arc::new(FixedProbe::new(measured));
    let transcoder = Arc::new(TaggingTranscoder::default());

    let pipeline = IngestionPipeline::new(
        storage.clone(),
        probe.clone(),
        transcoder.clone(),
        config.max_concurrent_transcodes(),
        config.duration_tolerance_secs(),
    );
    let state = Arc::new(AppState { config, pipeline });

    let app = routes::setup_routes(&state.config, state.clone()).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        probe,
        transcoder,
    }
}
