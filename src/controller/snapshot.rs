use crate::conversation::Message;
use crate::dispatch::{DispatchState, UseCase};
use crate::recognition::RecognitionState;
use crate::synthesis::SynthesisState;
use serde::Serialize;

/// Controller-level view of the interaction
///
/// Speaking is tracked separately in `ControllerSnapshot::synthesis` because
/// playback may outlive the exchange that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionPhase {
    Idle,
    Listening,
    /// A transcript was written into the input and not yet edited or sent
    Committed,
    Sending,
}

/// Read-only state published to the rendering layer
#[derive(Debug, Clone, Serialize)]
pub struct ControllerSnapshot {
    pub messages: Vec<Message>,

    /// Composed-message buffer (mirrors the live caption while listening)
    pub input: String,

    pub phase: InteractionPhase,

    pub recognition: RecognitionState,

    pub synthesis: SynthesisState,

    pub dispatch: DispatchState,

    pub speech_output_enabled: bool,

    pub use_case: UseCase,

    /// User-facing message for the last capture failure
    pub notice: Option<String>,

    /// Whether the composed buffer can be sent (see
    /// `ChatInteractionController::can_submit`); explicit text may still be
    /// sent while listening
    pub can_submit: bool,
}
