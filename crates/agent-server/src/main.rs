//! ReAct agent HTTP Server
//!
//! Axum-based server exposing the agent over a small REST API and serving
//! the compiled web front end.

mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::Agent;
use agent_runtime::RuntimeConfig;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = RuntimeConfig::from_env()?;
    tracing::info!(provider = config.provider.label(), model = %config.model, "configuration loaded");

    // Initialize LLM provider
    let provider = config.build_provider()?;

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to {}", provider.name());
            if let Ok(models) = provider.list_models().await {
                tracing::debug!(count = models.len(), "models available");
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ {} not reachable - chat requests will fail", provider.name());
        }
    }

    // Initialize tools
    let tools = react_tools::default_registry(config.tavily_api_key.as_deref())?;
    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    let agent = Agent::new(Arc::clone(&provider), Arc::new(tools), config.agent_config()?);
    let state = AppState::new(agent, provider);

    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into());
    let app = routes::router(state, &static_dir);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("ReAct agent server running on http://{}", addr);
    tracing::info!("  GET  /health      - Health check");
    tracing::info!("  GET  /api/models  - List available models");
    tracing::info!("  POST /api/chat    - Send a query");

    axum::serve(listener, app).await?;

    Ok(())
}
