pub mod metrics;
pub mod providers;

pub use providers::ollama::OllamaProvider;
pub use providers::{GenerationProvider, ProviderError};
