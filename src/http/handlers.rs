use super::state::AppState;
use crate::controller::CommandReply;
use crate::dispatch::UseCase;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct InputRequest {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    /// Text to send; the composed buffer is sent when omitted
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UseCaseRequest {
    pub use_case: UseCase,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn command_response(result: anyhow::Result<CommandReply>) -> Response {
    match result {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => {
            error!("Controller command failed: {:#}", e);
            error_response(StatusCode::SERVICE_UNAVAILABLE, format!("{:#}", e))
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /chat/state
pub async fn get_state(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.snapshot())
}

/// GET /chat/messages
pub async fn get_messages(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.snapshot().messages)
}

/// POST /chat/input
/// Replace the composed buffer (ignored while listening)
pub async fn set_input(
    State(state): State<AppState>,
    Json(req): Json<InputRequest>,
) -> impl IntoResponse {
    command_response(state.controller.set_input(req.text).await)
}

/// POST /chat/submit
pub async fn submit(
    State(state): State<AppState>,
    body: Option<Json<SubmitRequest>>,
) -> impl IntoResponse {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    command_response(state.controller.submit(req.text).await)
}

/// POST /chat/listening/toggle
pub async fn toggle_listening(State(state): State<AppState>) -> impl IntoResponse {
    command_response(state.controller.toggle_listening().await)
}

/// POST /chat/speech-output/toggle
pub async fn toggle_speech_output(State(state): State<AppState>) -> impl IntoResponse {
    command_response(state.controller.toggle_speech_output().await)
}

/// POST /chat/use-case
pub async fn set_use_case(
    State(state): State<AppState>,
    Json(req): Json<UseCaseRequest>,
) -> impl IntoResponse {
    command_response(state.controller.set_use_case(req.use_case).await)
}

/// GET /chat/examples
/// Suggested prompts from the assistant service
pub async fn get_chat_examples(State(state): State<AppState>) -> impl IntoResponse {
    match state.assistant.chat_examples().await {
        Ok(examples) => (StatusCode::OK, Json(examples)).into_response(),
        Err(e) => {
            error!("Failed to fetch chat examples: {:#}", e);
            error_response(StatusCode::BAD_GATEWAY, format!("{:#}", e))
        }
    }
}

/// GET /assistant/health
pub async fn get_assistant_health(State(state): State<AppState>) -> impl IntoResponse {
    match state.assistant.health().await {
        Ok(health) => (StatusCode::OK, Json(health)).into_response(),
        Err(e) => {
            error!("Assistant health check failed: {:#}", e);
            error_response(StatusCode::BAD_GATEWAY, format!("{:#}", e))
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
