//! Generation backend clients
//!
//! [`GenerationBackend`] is the uniform seam the orchestrator talks to.
//! [`HttpBackendClient`] implements it for REST JSON services speaking
//! either the Ollama or the OpenAI chat-completions request shape.

use super::config::{BackendConfig, BackendKind};
use super::prompt::Prompt;
use crate::chat::ToneMode;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Generation backend error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Response too short: {0} chars")]
    TooShort(usize),
}

impl BackendError {
    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::Timeout(_) => "timeout",
            BackendError::RequestFailed(_) => "request_failed",
            BackendError::UpstreamError(_) => "upstream_error",
            BackendError::InvalidResponse(_) => "invalid_response",
            BackendError::TooShort(_) => "too_short",
        }
    }
}

/// Uniform interface to an external text-generation service
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Name reported in `engine_used`
    fn name(&self) -> &str;

    /// Deadline the orchestrator enforces for one attempt
    fn timeout(&self) -> Duration;

    /// Generate raw text for a prompt within `timeout`
    async fn invoke(
        &self,
        prompt: &Prompt,
        mode: ToneMode,
        timeout: Duration,
    ) -> Result<String, BackendError>;
}

/// REST JSON generation backend
pub struct HttpBackendClient {
    http: Client,
    config: BackendConfig,
    api_key: Option<SecretString>,
}

impl HttpBackendClient {
    /// Create a new HTTP backend client
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let api_key = config.resolve_api_key();

        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn temperature(&self, mode: ToneMode) -> f32 {
        mode.pick(self.config.temperature, (self.config.temperature + 0.2).min(1.5))
    }

    fn ollama_request<'a>(&'a self, prompt: &'a Prompt, mode: ToneMode) -> OllamaRequest<'a> {
        OllamaRequest {
            model: &self.config.model,
            prompt: &prompt.user,
            system: &prompt.system,
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature(mode),
                num_predict: self.config.max_tokens,
            },
        }
    }

    fn chat_request<'a>(
        &'a self,
        prompt: &'a Prompt,
        mode: ToneMode,
    ) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessageOut {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessageOut {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature(mode),
            max_tokens: self.config.max_tokens,
        }
    }

    fn extract_text(&self, body: &str) -> Result<String, BackendError> {
        let text = match self.config.kind {
            BackendKind::Ollama => {
                let parsed: OllamaResponse = serde_json::from_str(body)
                    .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
                parsed.response
            }
            BackendKind::OpenAi => {
                let parsed: ChatCompletionResponse = serde_json::from_str(body)
                    .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
                parsed
                    .choices
                    .into_iter()
                    .next()
                    .map(|choice| choice.message.content)
                    .ok_or_else(|| {
                        BackendError::InvalidResponse("No choices in response".to_string())
                    })?
            }
        };
        Ok(text)
    }
}

#[async_trait]
impl GenerationBackend for HttpBackendClient {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    async fn invoke(
        &self,
        prompt: &Prompt,
        mode: ToneMode,
        timeout: Duration,
    ) -> Result<String, BackendError> {
        let url = self.config.kind.endpoint(&self.config.url);
        debug!("Calling backend {} at {}", self.config.name, url);

        let mut req = self.http.post(&url).timeout(timeout);
        req = match self.config.kind {
            BackendKind::Ollama => req.json(&self.ollama_request(prompt, mode)),
            BackendKind::OpenAi => req.json(&self.chat_request(prompt, mode)),
        };

        // Add bearer auth if API key is configured
        if let Some(api_key) = &self.api_key {
            req = req.bearer_auth(api_key.expose_secret());
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(e.to_string())
            } else {
                BackendError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BackendError::UpstreamError(format!(
                "Status {}: {}",
                status, error_text
            )));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(e.to_string())
            } else {
                BackendError::InvalidResponse(e.to_string())
            }
        })?;

        self.extract_text(&body)
    }
}

// Wire types for the Ollama generate API
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

// OpenAI-compatible API types
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessageOut<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessageOut<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageIn,
}

#[derive(Debug, Deserialize)]
struct ChatMessageIn {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> Prompt {
        Prompt {
            system: "system text".to_string(),
            user: "user text".to_string(),
        }
    }

    #[test]
    fn test_ollama_request_shape() {
        let client = HttpBackendClient::new(BackendConfig::new("local")).unwrap();
        let prompt = prompt();
        let body = serde_json::to_value(client.ollama_request(&prompt, ToneMode::Serious)).unwrap();
        assert_eq!(body["model"], "llama3");
        assert_eq!(body["prompt"], "user text");
        assert_eq!(body["system"], "system text");
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn test_openai_request_shape() {
        let config = BackendConfig::new("cloud").with_kind(BackendKind::OpenAi);
        let client = HttpBackendClient::new(config).unwrap();
        let prompt = prompt();
        let body = serde_json::to_value(client.chat_request(&prompt, ToneMode::Joking)).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user text");
        assert_eq!(body["max_tokens"], 600);
    }

    #[test]
    fn test_joking_runs_warmer() {
        let client = HttpBackendClient::new(BackendConfig::new("local")).unwrap();
        assert!(client.temperature(ToneMode::Joking) > client.temperature(ToneMode::Serious));
    }

    #[test]
    fn test_extract_text() {
        let client = HttpBackendClient::new(BackendConfig::new("local")).unwrap();
        assert_eq!(
            client.extract_text(r#"{"response": "hello there"}"#).unwrap(),
            "hello there"
        );
        assert!(matches!(
            client.extract_text("not json"),
            Err(BackendError::InvalidResponse(_))
        ));

        let openai =
            HttpBackendClient::new(BackendConfig::new("cloud").with_kind(BackendKind::OpenAi))
                .unwrap();
        assert!(matches!(
            openai.extract_text(r#"{"choices": []}"#),
            Err(BackendError::InvalidResponse(_))
        ));
    }
}
