//! Speech capture
//!
//! `RecognitionSession` hides the engine's event shapes from the controller:
//! - interim results become live captions
//! - final segments accumulate until the engine reports `Ended`
//! - engine errors are classified into `CaptureError` and discard the buffers

mod engine;
mod error;
mod session;

pub use engine::{RecognitionEngine, RecognitionEvent, Segment};
pub use error::{CaptureError, RecognitionError};
pub use session::{RecognitionSession, RecognitionState, RecognitionUpdate};
