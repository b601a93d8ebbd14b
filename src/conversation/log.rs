use super::message::{ContextMessage, Message, MessageId, Sender};
use chrono::Utc;
use serde::Serialize;

/// Append-only, chronologically ordered message history
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ConversationLog {
    messages: Vec<Message>,
    #[serde(skip)]
    last_id: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, assigning the next id and the current timestamp
    pub fn append(
        &mut self,
        sender: Sender,
        content: impl Into<String>,
        is_error: bool,
        insights: Option<serde_json::Value>,
    ) -> &Message {
        self.last_id += 1;

        self.messages.push(Message {
            id: MessageId(self.last_id),
            sender,
            content: content.into(),
            created_at: Utc::now(),
            is_error,
            insights,
        });

        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The last `window` exchanged messages, oldest first
    ///
    /// Locally generated error notices are not part of the exchange and are skipped.
    pub fn trailing_context(&self, window: usize) -> Vec<ContextMessage> {
        let mut context: Vec<ContextMessage> = self
            .messages
            .iter()
            .rev()
            .filter(|m| !m.is_error)
            .take(window)
            .map(ContextMessage::from)
            .collect();

        context.reverse();
        context
    }
}
