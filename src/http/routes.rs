use super::handlers;
use super::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Controller state
        .route("/chat/state", get(handlers::get_state))
        .route("/chat/messages", get(handlers::get_messages))
        // User actions
        .route("/chat/input", post(handlers::set_input))
        .route("/chat/submit", post(handlers::submit))
        .route("/chat/listening/toggle", post(handlers::toggle_listening))
        .route(
            "/chat/speech-output/toggle",
            post(handlers::toggle_speech_output),
        )
        .route("/chat/use-case", post(handlers::set_use_case))
        // Assistant pass-through
        .route("/chat/examples", get(handlers::get_chat_examples))
        .route("/assistant/health", get(handlers::get_assistant_health))
        .layer(cors_layer(cors_origins))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
