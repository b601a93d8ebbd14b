pub mod config;
pub mod controller;
pub mod conversation;
pub mod dispatch;
pub mod http;
pub mod nats;
pub mod recognition;
pub mod synthesis;

pub use config::Config;
pub use controller::{
    spawn_controller, ChatInteractionController, CommandReply, ControllerConfig, ControllerEvent,
    ControllerHandle, ControllerSnapshot, EventSink, InteractionPhase, UserCommand,
};
pub use conversation::{ContextMessage, ConversationLog, Message, MessageId, Sender};
pub use dispatch::{
    AssistantClient, ChatDispatcher, DispatchState, HttpAssistantClient, UseCase,
    ASSISTANT_UNAVAILABLE_MESSAGE,
};
pub use http::{create_router, AppState};
pub use nats::{NatsRecognitionEngine, NatsSynthesisEngine, SpeechBridge};
pub use recognition::{
    CaptureError, RecognitionEngine, RecognitionEvent, RecognitionSession, RecognitionState,
};
pub use synthesis::{SynthesisEngine, SynthesisEvent, SynthesisSession, SynthesisState};
