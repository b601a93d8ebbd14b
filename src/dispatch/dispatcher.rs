use super::client::AssistantClient;
use super::messages::{ChatRequest, ChatResponse, UseCase};
use crate::conversation::{ContextMessage, ConversationLog, MessageId, Sender};
use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Shown in place of a reply when the assistant could not be reached
pub const ASSISTANT_UNAVAILABLE_MESSAGE: &str =
    "Sorry, I'm having trouble connecting right now. Please try again in a moment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DispatchState {
    Idle,
    AwaitingResponse { request: MessageId },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("a request is already awaiting a response")]
    Busy,
}

/// Outcome of one network exchange, fed back through `ChatDispatcher::complete`
#[derive(Debug)]
pub struct DispatchCompletion {
    /// Id of the user message that started the exchange
    pub request_id: MessageId,
    pub outcome: Result<ChatResponse>,
}

/// The network half of a send; resolves once the service answers or fails
pub type DispatchFuture = BoxFuture<'static, DispatchCompletion>;

/// What `complete` appended to the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// An assistant reply worth reading aloud
    Replied(MessageId),
    /// The fixed apology, flagged as an error
    Failed(MessageId),
    /// The completion did not belong to the in-flight request
    Ignored,
}

/// Serializes requests to the assistant service, one at a time
pub struct ChatDispatcher {
    client: Arc<dyn AssistantClient>,
    earner_id: Option<String>,
    state: DispatchState,
}

impl ChatDispatcher {
    pub fn new(client: Arc<dyn AssistantClient>, earner_id: Option<String>) -> Self {
        Self {
            client,
            earner_id,
            state: DispatchState::Idle,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DispatchState::Idle
    }

    pub fn in_flight(&self) -> Option<MessageId> {
        match self.state {
            DispatchState::Idle => None,
            DispatchState::AwaitingResponse { request } => Some(request),
        }
    }

    /// Record the user's message and prepare the request
    ///
    /// The user message is appended before anything touches the network so it
    /// survives a failed exchange. The returned future must be driven to
    /// completion and its output handed to `complete`.
    pub fn send(
        &mut self,
        log: &mut ConversationLog,
        text: &str,
        use_case: UseCase,
        context: Vec<ContextMessage>,
    ) -> Result<DispatchFuture, DispatchError> {
        if !self.is_idle() {
            return Err(DispatchError::Busy);
        }

        let request_id = log.append(Sender::User, text, false, None).id;
        self.state = DispatchState::AwaitingResponse {
            request: request_id,
        };

        info!(
            "Dispatching message {} ({} context messages)",
            request_id,
            context.len()
        );

        let request = ChatRequest {
            message: text.to_string(),
            use_case,
            earner_id: self.earner_id.clone(),
            conversation_history: context,
        };

        let client = Arc::clone(&self.client);
        Ok(async move {
            // A panicking client still has to release the dispatcher
            let outcome = match AssertUnwindSafe(client.chat(request)).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(panic) => Err(anyhow!(
                    "Assistant client panicked: {}",
                    panic_message(panic.as_ref())
                )),
            };
            DispatchCompletion {
                request_id,
                outcome,
            }
        }
        .boxed())
    }

    /// Turn the network outcome into a log entry and return to idle
    pub fn complete(
        &mut self,
        log: &mut ConversationLog,
        completion: DispatchCompletion,
    ) -> DispatchResult {
        if self.in_flight() != Some(completion.request_id) {
            warn!(
                "Dropping completion for {} (in flight: {:?})",
                completion.request_id,
                self.in_flight()
            );
            return DispatchResult::Ignored;
        }

        self.state = DispatchState::Idle;

        let reply = completion.outcome.and_then(|response| {
            let text = response
                .reply_text()
                .map(str::to_string)
                .ok_or_else(|| anyhow!("Assistant returned no reply text"))?;
            Ok((text, response.earner_insights))
        });

        match reply {
            Ok((text, insights)) => {
                let id = log.append(Sender::Assistant, text, false, insights).id;
                info!("Assistant replied to {} with {}", completion.request_id, id);
                DispatchResult::Replied(id)
            }
            Err(e) => {
                warn!("Assistant unavailable for {}: {:#}", completion.request_id, e);
                let id = log
                    .append(Sender::Assistant, ASSISTANT_UNAVAILABLE_MESSAGE, true, None)
                    .id;
                DispatchResult::Failed(id)
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
