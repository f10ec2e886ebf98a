//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tempfile::TempDir;
use waypoint::channel::{DuplicatePolicy, Interface};
use waypoint::config::{Config, DuplicateObserverSetting};
use waypoint::demo::{DemoApp, MockEventService};

/// Default latency of the mock service used in tests.
pub const SERVICE_LATENCY: Duration = Duration::from_millis(100);

/// Config whose channels report duplicate observers instead of panicking.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.channel.duplicate_observer = DuplicateObserverSetting::Report;
    config
}

pub fn mock_service() -> MockEventService {
    MockEventService::new(SERVICE_LATENCY)
}

/// Launch the demo app. Must be called inside a tokio runtime.
pub fn launch(service: MockEventService) -> DemoApp<MockEventService> {
    DemoApp::launch(Arc::new(service), &test_config()).expect("Failed to launch demo app")
}

/// A consumed channel that records every action it receives.
pub fn recording_channel<A: Send + 'static>() -> (Interface<A>, Arc<Mutex<Vec<A>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let interface = Interface::consume(move |action: A| sink.lock().push(action));
    (interface, seen)
}

/// Write a config file into a fresh temporary directory.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Let spawned handler tasks run up to their first suspension point.
pub async fn run_pending_tasks() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}
