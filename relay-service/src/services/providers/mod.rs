//! Inference provider abstraction.
//!
//! Handlers talk to a [`GenerationProvider`] so the router can be exercised
//! against a stand-in backend; production wires in [`ollama::OllamaProvider`].

pub mod ollama;

use async_trait::async_trait;
use serde_json::{Map, Value};
use service_core::error::AppError;
use thiserror::Error;

use crate::models::UpstreamRequest;

/// Failure of a call to the inference server.
///
/// Every variant carries the text of the underlying error. Callers see them
/// all as one kind (see the `AppError` conversion below).
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

impl ProviderError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Timeout(_) => "timeout",
            ProviderError::Network(_) => "network",
            ProviderError::Status { .. } => "status",
            ProviderError::InvalidBody(_) => "invalid_body",
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::UpstreamUnavailable(err.to_string())
    }
}

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Issue exactly one generation call and return the upstream JSON object.
    async fn generate(
        &self,
        request: &UpstreamRequest<'_>,
        request_id: Option<&str>,
    ) -> Result<Map<String, Value>, ProviderError>;

    /// Cheap reachability check used by the readiness endpoint.
    async fn health_check(&self) -> Result<(), ProviderError>;
}

/// Render an error with its whole `source()` chain, e.g.
/// `error sending request: tcp connect error: Connection refused`.
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn error_chain_includes_sources() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "Connection refused",
        ));
        assert_eq!(error_chain(&err), "outer: Connection refused");
    }

    #[test]
    fn every_provider_error_becomes_bad_gateway() {
        let errors = [
            ProviderError::Timeout("operation timed out".into()),
            ProviderError::Network("Connection refused".into()),
            ProviderError::Status {
                status: 404,
                body: "model not found".into(),
            },
            ProviderError::InvalidBody("expected value".into()),
        ];

        for err in errors {
            let text = err.to_string();
            let app: AppError = err.into();
            assert_eq!(app.status_code(), StatusCode::BAD_GATEWAY);
            assert!(app.to_string().contains(&text));
        }
    }
}
