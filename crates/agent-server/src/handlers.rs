//! HTTP Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use agent_core::{AgentError, Message, transcript};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
    pub provider_connected: bool,
    pub tools: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Messages for the chat panel
    pub chat: Vec<Message>,
    /// Thoughts, actions and observations
    pub trace: Vec<Message>,
    /// Think cycles used by this query
    pub iterations: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub provider: String,
    pub models: Vec<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

/// Status and code for an agent failure
fn classify(err: &AgentError) -> (StatusCode, &'static str) {
    match err {
        AgentError::Provider(_) | AgentError::ProviderUnavailable(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE")
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "AGENT_ERROR"),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        provider: state.provider.name().to_string(),
        provider_connected,
        tools: state.tools.as_ref().clone(),
    })
}

/// Models offered by the configured provider
pub async fn list_models(State(state): State<AppState>) -> Result<Json<ModelsResponse>, ApiError> {
    let models = state.provider.list_models().await.map_err(|e| {
        tracing::warn!("Model listing failed: {}", e);
        let (status, code) = classify(&e);
        api_error(status, e.user_message(), code)
    })?;

    Ok(Json(ModelsResponse {
        provider: state.provider.name().to_string(),
        models: models.into_iter().map(|m| m.id).collect(),
    }))
}

/// Main chat endpoint
///
/// Runs one query on the shared agent and returns the produced messages,
/// split into chat and trace.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let query = payload.message.trim();
    if query.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Message cannot be empty", "EMPTY_MESSAGE"));
    }

    let request_id = uuid::Uuid::new_v4();
    tracing::info!(%request_id, "chat request");

    let mut agent = state.agent.lock().await;
    let turn = agent.respond(query).await.map_err(|e| {
        tracing::error!(%request_id, "Agent error: {}", e);
        let (status, code) = classify(&e);
        api_error(status, e.user_message(), code)
    })?;
    drop(agent);

    tracing::info!(%request_id, iterations = turn.iterations, "chat answered");
    let transcript::Transcript { chat, trace } = transcript::split(&turn.messages);

    Ok(Json(ChatResponse {
        chat,
        trace,
        iterations: turn.iterations,
    }))
}
