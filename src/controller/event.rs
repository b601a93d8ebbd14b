use crate::dispatch::{DispatchCompletion, UseCase};
use crate::recognition::RecognitionEvent;
use crate::synthesis::SynthesisEvent;
use tokio::sync::mpsc;
use tracing::warn;

/// Everything that re-enters the controller asynchronously
#[derive(Debug)]
pub enum ControllerEvent {
    Recognition(RecognitionEvent),
    Synthesis(SynthesisEvent),
    Dispatch(DispatchCompletion),
}

/// User actions coming from the rendering layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    SetInput(String),
    /// Submit the given text, or the composed buffer when `None`
    Submit(Option<String>),
    ToggleListening,
    ToggleSpeechOutput,
    SetUseCase(UseCase),
}

/// Cloneable handle engines and dispatch tasks use to post events
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<ControllerEvent>,
}

impl EventSink {
    /// Create a sink and the receiver the controller loop drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ControllerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, event: ControllerEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!("Controller is gone, dropping event: {:?}", e.0);
        }
    }

    pub fn recognition(&self, event: RecognitionEvent) {
        self.send(ControllerEvent::Recognition(event));
    }

    pub fn synthesis(&self, event: SynthesisEvent) {
        self.send(ControllerEvent::Synthesis(event));
    }
}
