//! Conversation history
//!
//! The `ConversationLog` is the only state shared between the dispatcher and
//! the rendering layer, and it only ever grows by append.

mod log;
mod message;

pub use log::ConversationLog;
pub use message::{ContextMessage, Message, MessageId, Sender};
