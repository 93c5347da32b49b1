use chat_engine::chat::{build_router, ChatService, ChatState};
use chat_engine::config::AppConfig;
use chat_engine::observability::init_tracing;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    let service = Arc::new(ChatService::from_config(&config));
    info!(
        "Chat engine ready with backends: [{}]",
        service.orchestrator().backend_names().join(", ")
    );

    let state = ChatState {
        service,
        max_message_chars: config.chat.max_message_chars,
    };
    let router = build_router(state, config.server.max_body_bytes);

    // Start server
    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on {}", address);

    axum::serve(listener, router).await?;

    Ok(())
}
