mod config;
mod error;
mod gemini;
mod models;
mod parser;
mod pipeline;
mod prompt;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AppConfig;
use crate::gemini::{CompletionClient, GeminiClient};
use crate::routes::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env();
    tracing::info!(model = %config.model, strict_sections = config.strict_sections, "Using API key: {}...", config.key_preview());

    let gemini = GeminiClient::new(config.api_key.clone(), config.api_base.clone(), config.model.clone(), config.temperature);
    let state = AppState::new(Arc::new(gemini), config.pipeline_options());
    if state.gemini.is_demo() {
        tracing::warn!("GEMINI_API_KEY not set, serving demo prompts");
    }

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
