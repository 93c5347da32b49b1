//! Crate-level error type
//!
//! The chat pipeline itself never fails; these errors cover configuration
//! loading and the request validation done by the HTTP surface. Backend and
//! snapshot failures have their own error types and never escape a request.

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ChatError>;

/// Errors raised outside the guaranteed-success respond path
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ChatError {
    /// Stable machine-readable code used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            ChatError::Config(_) | ChatError::InvalidConfig(_) => "CONFIG_ERROR",
            ChatError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}
