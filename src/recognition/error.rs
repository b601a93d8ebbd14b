use serde::Serialize;
use thiserror::Error;

/// Classified speech capture failure reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum CaptureError {
    NoSpeech,
    DeviceUnavailable,
    PermissionDenied,
    Network,
    Other(String),
}

impl CaptureError {
    /// Classify a raw engine error code
    pub fn from_code(code: &str) -> Self {
        match code {
            "no-speech" => CaptureError::NoSpeech,
            "audio-capture" => CaptureError::DeviceUnavailable,
            "not-allowed" | "service-not-allowed" => CaptureError::PermissionDenied,
            "network" => CaptureError::Network,
            other => CaptureError::Other(other.to_string()),
        }
    }

    /// Fixed message shown to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            CaptureError::NoSpeech => "No speech was detected. Please try again.",
            CaptureError::DeviceUnavailable => {
                "No microphone was found. Please check that one is connected."
            }
            CaptureError::PermissionDenied => {
                "Microphone access was denied. Please allow microphone access and try again."
            }
            CaptureError::Network => {
                "Speech recognition needs a network connection. Please check your connection."
            }
            CaptureError::Other(_) => "Speech recognition failed. Please try again.",
        }
    }
}

/// Errors returned by `RecognitionSession` commands
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("speech recognition is already active")]
    AlreadyActive,

    #[error("speech engine refused the command: {0}")]
    Engine(#[source] anyhow::Error),
}
