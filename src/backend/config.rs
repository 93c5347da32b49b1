//! Configuration for external generation backends

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Request shape spoken by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// `POST {url}/api/generate` with a single prompt
    Ollama,
    /// `POST {url}/v1/chat/completions` with system and user messages
    #[serde(alias = "openai-compatible")]
    OpenAi,
}

impl BackendKind {
    pub fn endpoint(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self {
            BackendKind::Ollama => format!("{}/api/generate", base),
            BackendKind::OpenAi => format!("{}/v1/chat/completions", base),
        }
    }
}

/// A single configured generation backend
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Unique name, reported as `external-backend:<name>`
    pub name: String,

    #[serde(default = "default_kind")]
    pub kind: BackendKind,

    /// Base URL of the service
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer token; falls back to the variable named by `api_key_env`
    #[serde(default)]
    pub api_key: Option<SecretString>,

    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Hard deadline for one attempt in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

// Default value functions
fn default_kind() -> BackendKind { BackendKind::Ollama }
fn default_url() -> String { "http://localhost:11434".to_string() }
fn default_model() -> String { "llama3".to_string() }
fn default_timeout_ms() -> u64 { 4000 }
fn default_enabled() -> bool { true }
fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 600 }

impl BackendConfig {
    /// Local backend with defaults for everything but the name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: default_kind(),
            url: default_url(),
            model: default_model(),
            api_key: None,
            api_key_env: None,
            timeout_ms: default_timeout_ms(),
            enabled: default_enabled(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }

    pub fn with_kind(mut self, kind: BackendKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Explicit key first, then the configured environment variable
    pub fn resolve_api_key(&self) -> Option<SecretString> {
        if let Some(key) = &self.api_key {
            return Some(key.clone());
        }
        self.api_key_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|val| !val.trim().is_empty())
            .map(SecretString::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_defaults() {
        let config = BackendConfig::new("local");
        assert_eq!(config.kind, BackendKind::Ollama);
        assert_eq!(config.url, "http://localhost:11434");
        assert_eq!(config.timeout(), Duration::from_millis(4000));
        assert!(config.enabled);
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(
            BackendKind::Ollama.endpoint("http://localhost:11434/"),
            "http://localhost:11434/api/generate"
        );
        assert_eq!(
            BackendKind::OpenAi.endpoint("https://api.example.com"),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: BackendConfig =
            serde_json::from_str(r#"{"name": "cloud", "kind": "openai", "timeout_ms": 5000}"#)
                .unwrap();
        assert_eq!(config.kind, BackendKind::OpenAi);
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.model, "llama3");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_api_key_from_env() {
        std::env::set_var("CHAT_ENGINE_TEST_BACKEND_KEY", "secret-value");
        let mut config = BackendConfig::new("cloud");
        config.api_key_env = Some("CHAT_ENGINE_TEST_BACKEND_KEY".to_string());

        let key = config.resolve_api_key().unwrap();
        assert_eq!(key.expose_secret(), "secret-value");

        std::env::remove_var("CHAT_ENGINE_TEST_BACKEND_KEY");
    }
}
