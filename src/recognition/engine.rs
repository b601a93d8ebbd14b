use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One piece of a recognition result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub is_final: bool,
}

impl Segment {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn finalized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// Events emitted by a platform speech-to-text engine, in emission order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecognitionEvent {
    Started,
    Result { segments: Vec<Segment> },
    /// Raw engine error code, e.g. "no-speech" or "not-allowed"
    Error { code: String },
    Ended,
}

/// Speech-to-text engine abstraction
///
/// Implementations only issue commands. Everything the engine reports back
/// arrives later as `RecognitionEvent`s delivered to the controller.
///
/// Implementations:
/// - NATS: forwards commands to an out-of-process speech service
/// - Tests: records commands so assertions can inspect them
pub trait RecognitionEngine: Send {
    /// Ask the engine to begin capturing
    fn start(&mut self) -> Result<()>;

    /// Ask the engine to end capture; the engine answers with `Ended`
    fn stop(&mut self) -> Result<()>;

    /// Engine name for logging
    fn name(&self) -> &str;
}
