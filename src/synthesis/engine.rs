use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag identifying one speak request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utterance-{}", self.0)
    }
}

/// Events emitted by a platform text-to-speech engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SynthesisEvent {
    Started { utterance: UtteranceId },
    Ended { utterance: UtteranceId },
    Error { utterance: UtteranceId },
}

impl SynthesisEvent {
    pub fn utterance(&self) -> UtteranceId {
        match self {
            SynthesisEvent::Started { utterance }
            | SynthesisEvent::Ended { utterance }
            | SynthesisEvent::Error { utterance } => *utterance,
        }
    }
}

/// Text-to-speech engine abstraction
pub trait SynthesisEngine: Send {
    /// Begin speaking `text`; events for it carry `utterance`
    fn speak(&mut self, utterance: UtteranceId, text: &str) -> Result<()>;

    /// Silence any utterance in progress
    ///
    /// No audio may be produced once this returns.
    fn cancel(&mut self) -> Result<()>;

    /// Engine name for logging
    fn name(&self) -> &str;
}
