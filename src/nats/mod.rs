pub mod client;
pub mod messages;
mod recognition;
mod synthesis;

pub use client::SpeechBridge;
pub use messages::{
    RecognitionCommand, RecognitionCommandMessage, RecognitionEventMessage, SynthesisCommand,
    SynthesisCommandMessage, SynthesisEventMessage,
};
pub use recognition::NatsRecognitionEngine;
pub use synthesis::NatsSynthesisEngine;
