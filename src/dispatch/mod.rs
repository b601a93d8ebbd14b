//! Message exchange with the remote assistant service
//!
//! - `AssistantClient`: the service boundary (HTTP in production)
//! - `ChatDispatcher`: one request in flight at a time, failures absorbed
//!   into the conversation log

mod client;
mod dispatcher;
pub mod messages;

pub use client::{AssistantClient, HttpAssistantClient};
pub use dispatcher::{
    ChatDispatcher, DispatchCompletion, DispatchError, DispatchFuture, DispatchResult,
    DispatchState, ASSISTANT_UNAVAILABLE_MESSAGE,
};
pub use messages::{AssistantHealth, ChatExamples, ChatRequest, ChatResponse, UseCase};
