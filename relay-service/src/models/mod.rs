//! Wire types for the relay endpoint and the inference server.

pub mod generation;

pub use generation::{GenerationRequest, GenerationResponse, UpstreamRequest, DEFAULT_MODEL};
