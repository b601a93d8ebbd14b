use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a message within one conversation
///
/// Ids start at 1 and grow by exactly one per appended message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// A single entry in the conversation log (immutable once created)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,

    pub sender: Sender,

    pub content: String,

    pub created_at: DateTime<Utc>,

    /// True when the content is a locally generated failure notice,
    /// not an assistant reply
    pub is_error: bool,

    /// Backend analytics attached to an assistant reply, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<serde_json::Value>,
}

/// A message trimmed down to what the assistant service needs as history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: Sender,
    pub content: String,
}

impl From<&Message> for ContextMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.sender,
            content: message.content.clone(),
        }
    }
}
