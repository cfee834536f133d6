//! FAQ chat - menu-driven question answering over a CSV knowledge base
//!
//! Serves subject and question menus built from the data file, answers
//! selections with the stored answer, and optionally forwards free-text
//! questions to an OpenAI-compatible completion server.

mod api;
mod assistant;
mod catalog;
mod config;
mod knowledge;
mod llm;
mod menu;
mod runtime;
mod session;
mod state_machine;

use api::{create_router, AppState};
use catalog::CatalogStatus;
use config::AppConfig;
use runtime::{AssistantSettings, SessionManager};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faq_chat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env();

    // Load the knowledge base once; failure leaves every session in the diagnostic state
    let catalog = CatalogStatus::load(&config.data_path);
    if !catalog.is_ready() {
        tracing::warn!(path = %config.data_path.display(), "Serving without data");
    }

    // Free-text questions
    let assistant = config.llm.build_service().map(|llm| {
        tracing::info!(
            model = %llm.model_id(),
            timeout_secs = config.llm.timeout.as_secs(),
            "Completion service configured"
        );
        AssistantSettings {
            llm,
            sampling: config.llm.sampling,
            deadline: config.llm.timeout,
        }
    });
    if assistant.is_none() {
        tracing::warn!("No completion server configured. Set FAQ_LLM_BASE_URL to enable free-text questions.");
    }

    // Create application state
    let sessions = SessionManager::new(catalog, config.answer_style, assistant);
    let state = AppState::new(sessions);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state).layer(cors).layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("FAQ chat server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
