use crate::recognition::RecognitionEvent;
use crate::synthesis::{SynthesisEvent, UtteranceId};
use serde::{Deserialize, Serialize};

/// Capture command published to the speech service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionCommandMessage {
    pub session_id: String,
    pub command: RecognitionCommand,
    pub timestamp: String, // RFC3339 timestamp
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionCommand {
    Start,
    Stop,
}

/// Recognition event received from the speech service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionEventMessage {
    pub session_id: String,
    #[serde(flatten)]
    pub event: RecognitionEvent,
}

/// Playback command published to the speech service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisCommandMessage {
    pub session_id: String,
    #[serde(flatten)]
    pub command: SynthesisCommand,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SynthesisCommand {
    Speak { utterance: UtteranceId, text: String },
    Cancel,
}

/// Playback event received from the speech service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisEventMessage {
    pub session_id: String,
    #[serde(flatten)]
    pub event: SynthesisEvent,
}
