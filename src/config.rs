//! Application configuration
//!
//! Loaded from an optional TOML/YAML/JSON file followed by `CHAT_ENGINE__*`
//! environment overrides (double underscore separates nesting levels).

use crate::backend::{BackendConfig, DEFAULT_MIN_RESPONSE_CHARS};
use crate::error::{ChatError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Default config file stem, resolved relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config/chat-engine";
/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "CHAT_ENGINE_CONFIG";
const ENV_PREFIX: &str = "CHAT_ENGINE";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    /// Generation backends in priority order
    #[serde(default)]
    pub backends: Vec<BackendConfig>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

/// Chat pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Backend replies must be longer than this many characters
    #[serde(default = "default_min_response_chars")]
    pub min_response_chars: usize,

    /// JSON file holding the metrics snapshot; zeroed metrics when unset
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,

    /// Pins phrase selection for reproducible output
    #[serde(default)]
    pub random_seed: Option<u64>,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_max_body_bytes() -> usize {
    16 * 1024
}

fn default_level() -> String {
    "info".to_string()
}

fn default_max_message_chars() -> usize {
    2000
}

fn default_min_response_chars() -> usize {
    DEFAULT_MIN_RESPONSE_CHARS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_chars: default_max_message_chars(),
            min_response_chars: default_min_response_chars(),
            snapshot_path: None,
            random_seed: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load from the default locations and validate
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Load from `path` (optional, any format the `config` crate detects) plus environment overrides
    pub fn load_from(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would misbehave at runtime
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ChatError::InvalidConfig("server.port must be non-zero".to_string()));
        }
        if self.chat.max_message_chars == 0 {
            return Err(ChatError::InvalidConfig(
                "chat.max_message_chars must be non-zero".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for backend in &self.backends {
            if backend.name.trim().is_empty() {
                return Err(ChatError::InvalidConfig("backend name cannot be empty".to_string()));
            }
            if !names.insert(backend.name.as_str()) {
                return Err(ChatError::InvalidConfig(format!(
                    "duplicate backend name: {}",
                    backend.name
                )));
            }
            if backend.timeout_ms == 0 {
                return Err(ChatError::InvalidConfig(format!(
                    "backend {} must have a non-zero timeout_ms",
                    backend.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendKind;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_address(), "127.0.0.1:8090");
        assert_eq!(config.server.max_body_bytes, 16384);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.chat.max_message_chars, 2000);
        assert_eq!(config.chat.min_response_chars, 20);
        assert!(config.backends.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!("chat-engine-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9100

[chat]
random_seed = 42

[[backends]]
name = "local"
timeout_ms = 1500

[[backends]]
name = "cloud"
kind = "openai"
url = "https://api.example.com"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.chat.random_seed, Some(42));
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.backends[0].timeout_ms, 1500);
        assert_eq!(config.backends[1].kind, BackendKind::OpenAi);
        assert_eq!(config.backends[1].timeout_ms, 4000);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_from("/nonexistent/chat-engine-config").unwrap();
        assert_eq!(config.server.port, 8090);
    }

    #[test]
    fn test_rejects_duplicate_backends() {
        let mut config = AppConfig::default();
        config.backends = vec![BackendConfig::new("a"), BackendConfig::new("a")];
        assert!(matches!(config.validate(), Err(ChatError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.backends = vec![BackendConfig::new("a").with_timeout_ms(0)];
        assert!(config.validate().is_err());
    }
}
