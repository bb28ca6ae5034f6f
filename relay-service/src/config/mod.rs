use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_optional_env, is_production};
use service_core::error::AppError;
use std::time::Duration;
use validator::Validate;

/// Generate endpoint of the local inference server. Host port 11435 is
/// mapped to the container's 11434.
pub const DEFAULT_GENERATE_URL: &str = "http://127.0.0.1:11435/api/generate";

/// Upper bound on a single relayed generation call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Readiness probes must answer well before orchestrator probe deadlines.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub upstream: UpstreamConfig,
    pub observability: ObservabilityConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpstreamConfig {
    #[validate(url(message = "OLLAMA_GENERATE_URL must be an absolute URL"))]
    pub generate_url: String,
    #[validate(range(min = 1, max = 3600, message = "OLLAMA_TIMEOUT_SECS must be 1-3600"))]
    pub timeout_secs: u64,
    #[validate(range(min = 1, max = 60, message = "OLLAMA_PROBE_TIMEOUT_SECS must be 1-60"))]
    pub probe_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            generate_url: DEFAULT_GENERATE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// `*` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = is_production();

        let upstream = UpstreamConfig {
            generate_url: get_env("OLLAMA_GENERATE_URL", Some(DEFAULT_GENERATE_URL), is_prod)?,
            timeout_secs: parse_secs(
                "OLLAMA_TIMEOUT_SECS",
                &get_env(
                    "OLLAMA_TIMEOUT_SECS",
                    Some(&DEFAULT_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?,
            )?,
            probe_timeout_secs: parse_secs(
                "OLLAMA_PROBE_TIMEOUT_SECS",
                &get_env(
                    "OLLAMA_PROBE_TIMEOUT_SECS",
                    Some(&DEFAULT_PROBE_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?,
            )?,
        };

        let config = RelayConfig {
            common,
            upstream,
            observability: ObservabilityConfig {
                log_level: get_env("LOG_LEVEL", Some("info"), false)?,
                otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some("*"),
                    false,
                )?),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail later, on the first relayed call.
    pub fn validate(&self) -> Result<(), AppError> {
        self.upstream.validate().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Invalid upstream settings: {}", e))
        })
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, AppError> {
    raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "{} must be a whole number of seconds, got '{}': {}",
            key,
            raw,
            e
        ))
    })
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
