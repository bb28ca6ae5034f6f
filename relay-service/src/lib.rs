//! relay-service: forwards generation requests to a local Ollama-compatible
//! server and relays its answer.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{AppState, Application};
