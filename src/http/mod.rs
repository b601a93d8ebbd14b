//! HTTP API for the rendering layer
//!
//! This module exposes the chat controller over REST:
//! - GET /chat/state - Full controller snapshot
//! - GET /chat/messages - Conversation log
//! - POST /chat/input - Replace the composed buffer
//! - POST /chat/submit - Send a message
//! - POST /chat/listening/toggle - Start or stop speech capture
//! - POST /chat/speech-output/toggle - Enable or silence spoken replies
//! - POST /chat/use-case - Select the assistant prompt template
//! - GET /chat/examples - Suggested prompts
//! - GET /assistant/health - Assistant service status
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
