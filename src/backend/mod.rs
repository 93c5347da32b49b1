//! External text-generation backends
//!
//! Backends are tried strictly in configured order; the first acceptable
//! completion wins and every failure falls through to the next backend.

pub mod client;
pub mod config;
pub mod orchestrator;
pub mod prompt;

pub use client::{BackendError, GenerationBackend, HttpBackendClient};
pub use config::{BackendConfig, BackendKind};
pub use orchestrator::{
    AttemptOutcome, BackendOrchestrator, GeneratedReply, GenerationAttempt, OrchestrationReport,
    DEFAULT_MIN_RESPONSE_CHARS,
};
pub use prompt::{Prompt, PromptBuilder};

use std::sync::Arc;
use tracing::{info, warn};

/// Build HTTP clients for every enabled backend, preserving order.
///
/// A backend whose client cannot be constructed is skipped with a warning.
pub fn build_backends(configs: &[BackendConfig]) -> Vec<Arc<dyn GenerationBackend>> {
    let mut backends: Vec<Arc<dyn GenerationBackend>> = Vec::new();

    for config in configs {
        if !config.enabled {
            info!("Backend {} is disabled", config.name);
            continue;
        }
        match HttpBackendClient::new(config.clone()) {
            Ok(client) => backends.push(Arc::new(client)),
            Err(e) => warn!("Skipping backend {}: {}", config.name, e),
        }
    }

    info!("Initialized {} generation backends", backends.len());
    backends
}
