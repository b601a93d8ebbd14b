use crate::controller::ControllerHandle;
use crate::dispatch::AssistantClient;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The running chat controller
    pub controller: ControllerHandle,

    /// Assistant service, for pass-through queries that bypass the controller
    pub assistant: Arc<dyn AssistantClient>,
}

impl AppState {
    pub fn new(controller: ControllerHandle, assistant: Arc<dyn AssistantClient>) -> Self {
        Self {
            controller,
            assistant,
        }
    }
}
