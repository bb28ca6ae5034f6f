//! Ollama-compatible generation backend.
//!
//! Sends `{model, prompt, stream}` to the configured `/api/generate` URL and
//! hands back the decoded JSON object. No retries: one call per request.

use super::{error_chain, GenerationProvider, ProviderError};
use crate::config::UpstreamConfig;
use crate::models::UpstreamRequest;
use crate::services::metrics;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::{Map, Value};
use service_core::error::AppError;
use service_core::observability::TracedClientExt;
use std::time::{Duration, Instant};

/// Upstream error bodies are echoed to callers; keep them short.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Clone)]
pub struct OllamaProvider {
    client: Client,
    generate_url: String,
    probe_url: String,
    probe_timeout: Duration,
}

impl OllamaProvider {
    pub fn new(config: &UpstreamConfig) -> Result<Self, AppError> {
        let url = Url::parse(&config.generate_url).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid upstream URL '{}': {}",
                config.generate_url,
                e
            ))
        })?;
        // The server root answers GET once the daemon is up.
        let probe_url = url
            .join("/")
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid upstream URL: {}", e)))?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            generate_url: url.to_string(),
            probe_url: probe_url.to_string(),
            probe_timeout: config.probe_timeout(),
        })
    }

    pub fn generate_url(&self) -> &str {
        &self.generate_url
    }

    async fn send_generate(
        &self,
        request: &UpstreamRequest<'_>,
        request_id: Option<&str>,
    ) -> Result<Map<String, Value>, ProviderError> {
        let response = self
            .client
            .traced_post(&self.generate_url)
            .json(request)
            .send(request_id)
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: status_body(response.text().await),
            });
        }

        // The timeout also covers reading the body.
        let bytes = response.bytes().await.map_err(classify)?;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ProviderError::InvalidBody(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(ProviderError::InvalidBody(e.to_string())),
        }
    }
}

#[async_trait]
impl GenerationProvider for OllamaProvider {
    async fn generate(
        &self,
        request: &UpstreamRequest<'_>,
        request_id: Option<&str>,
    ) -> Result<Map<String, Value>, ProviderError> {
        tracing::debug!(
            url = %self.generate_url,
            model = %request.model,
            prompt_len = request.prompt.len(),
            stream = request.stream,
            "Sending request to inference server"
        );

        let start = Instant::now();
        let result = self.send_generate(request, request_id).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => {
                metrics::record_upstream_call("success", elapsed);
                tracing::info!(
                    model = %request.model,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Inference server responded"
                );
            }
            Err(e) => {
                metrics::record_upstream_call(e.kind(), elapsed);
                tracing::warn!(
                    model = %request.model,
                    kind = e.kind(),
                    error = %e,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Inference server call failed"
                );
            }
        }

        result
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        // Any HTTP answer means the server is reachable.
        self.client
            .traced_get(&self.probe_url)
            .timeout(self.probe_timeout)
            .send(None)
            .await
            .map(|_| ())
            .map_err(classify)
    }
}

fn classify(err: reqwest::Error) -> ProviderError {
    let text = error_chain(&err);
    if err.is_timeout() {
        ProviderError::Timeout(text)
    } else {
        ProviderError::Network(text)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Text reported for a non-success answer, or why its body could not be read.
fn status_body<E: std::error::Error + 'static>(body: Result<String, E>) -> String {
    match body {
        Ok(text) => truncate(text.trim(), MAX_ERROR_BODY_CHARS),
        Err(e) => format!("<body unavailable: {}>", error_chain(&e)),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
