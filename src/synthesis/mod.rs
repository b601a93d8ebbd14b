//! Speech playback for assistant replies

mod engine;
mod sanitize;
mod session;

pub use engine::{SynthesisEngine, SynthesisEvent, UtteranceId};
pub use sanitize::sanitize_for_speech;
pub use session::{SynthesisSession, SynthesisState};
