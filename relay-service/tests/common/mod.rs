//! Shared helpers for relay-service integration tests.

#![allow(dead_code)]

use relay_service::config::{
    CorsConfig, ObservabilityConfig, RelayConfig, UpstreamConfig, DEFAULT_PROBE_TIMEOUT_SECS,
};
use relay_service::startup::Application;
use service_core::config::Config;
use std::time::Duration;
use tokio::net::TcpListener;

pub const GENERATE_PATH: &str = "/api/generate";

/// Config pointing the relay at `generate_url` on a random local port.
pub fn test_config(generate_url: &str, timeout_secs: u64) -> RelayConfig {
    RelayConfig {
        common: Config {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        upstream: UpstreamConfig {
            generate_url: generate_url.to_string(),
            timeout_secs,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
        },
        observability: ObservabilityConfig {
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
        cors: CorsConfig {
            allowed_origins: vec!["*".to_string()],
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// Spawn the application on a random port in the background.
pub async fn spawn_app(config: RelayConfig) -> TestApp {
    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build client"),
    }
}

/// Generate URL on a local port with nothing listening.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}{}", port, GENERATE_PATH)
}
