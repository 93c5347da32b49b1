//! HTTP surface for the chat service

use super::models::{ChatResult, ToneMode};
use super::service::ChatService;
use crate::error::ChatError;
use crate::metrics::METRICS;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state for chat handlers
#[derive(Clone)]
pub struct ChatState {
    pub service: Arc<ChatService>,
    pub max_message_chars: usize,
}

/// Chat request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub mode: ToneMode,
}

/// API error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl From<&ChatError> for ApiError {
    fn from(err: &ChatError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Answer a chat message
///
/// POST /api/v1/chat
pub async fn chat(
    State(state): State<ChatState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResult>, (StatusCode, Json<ApiError>)> {
    let chars = request.message.chars().count();
    info!("Chat request: {} chars, mode {}", chars, request.mode);

    if chars > state.max_message_chars {
        let err = ChatError::Validation(format!(
            "Message cannot exceed {} characters",
            state.max_message_chars
        ));
        warn!("Rejected chat request: {}", err);
        return Err((StatusCode::BAD_REQUEST, Json(ApiError::from(&err))));
    }

    Ok(Json(state.service.respond(&request.message, request.mode).await))
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.export_prometheus(),
    )
}

/// Build the HTTP router
pub fn build_router(state: ChatState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/v1/chat", post(chat))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_mode_defaults_to_serious() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(request.mode, ToneMode::Serious);

        let request: ChatRequest =
            serde_json::from_str(r#"{"message": "hi", "mode": "joking"}"#).unwrap();
        assert_eq!(request.mode, ToneMode::Joking);
    }

    #[test]
    fn test_api_error_from_chat_error() {
        let err = ChatError::Validation("too long".to_string());
        let body = ApiError::from(&err);
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(body.message, "Validation error: too long");
    }
}
