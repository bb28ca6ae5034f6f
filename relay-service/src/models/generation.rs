use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Model used when the caller does not name one.
pub const DEFAULT_MODEL: &str = "deepseek-r1:8b";

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Inbound body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub stream: bool,
}

impl GenerationRequest {
    pub fn to_upstream(&self) -> UpstreamRequest<'_> {
        UpstreamRequest {
            model: &self.model,
            prompt: &self.prompt,
            stream: self.stream,
        }
    }
}

/// Body sent to the inference server's generate endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpstreamRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// Relayed result: the generated text plus the untouched upstream payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub response: String,
    pub raw: Map<String, Value>,
}

impl GenerationResponse {
    /// `response` is empty when upstream sent no string `response` field.
    pub fn from_upstream(raw: Map<String, Value>) -> Self {
        let response = raw
            .get("response")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Self { response, raw }
    }
}
