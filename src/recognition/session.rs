use super::engine::{RecognitionEngine, RecognitionEvent};
use super::error::{CaptureError, RecognitionError};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Lifecycle of a recognition session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionState {
    Idle,
    Listening,
    /// Passed through while an engine error is being classified; the session
    /// settles in `Idle` before `handle_event` returns
    Erroring,
}

/// What the controller needs to know after an engine event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionUpdate {
    /// Live caption: committed segments followed by the current interim text
    Interim(String),
    /// Capture ended with a transcript
    Committed(String),
    /// Capture ended with nothing heard
    Ended,
    /// Capture failed; buffers were discarded
    Failed(CaptureError),
}

/// Wraps a speech-to-text engine and accumulates the transcript of one capture
pub struct RecognitionSession {
    engine: Box<dyn RecognitionEngine>,

    state: RecognitionState,

    /// Best-effort partial transcript, overwritten on every result
    interim_text: String,

    /// Final segments received during the current capture, in arrival order
    pending_final: Vec<String>,
}

impl RecognitionSession {
    pub fn new(engine: Box<dyn RecognitionEngine>) -> Self {
        Self {
            engine,
            state: RecognitionState::Idle,
            interim_text: String::new(),
            pending_final: Vec::new(),
        }
    }

    pub fn state(&self) -> RecognitionState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == RecognitionState::Listening
    }

    pub fn interim_text(&self) -> &str {
        &self.interim_text
    }

    /// Request capture from the engine
    pub fn start(&mut self) -> Result<(), RecognitionError> {
        if self.state != RecognitionState::Idle {
            return Err(RecognitionError::AlreadyActive);
        }

        info!("Starting speech recognition ({})", self.engine.name());

        self.engine.start().map_err(RecognitionError::Engine)?;

        self.clear_buffers();
        self.transition(RecognitionState::Listening);
        Ok(())
    }

    /// Ask the engine to end capture
    ///
    /// The session stays `Listening` until the engine reports `Ended`, so
    /// trailing results delivered after this call still count.
    pub fn stop(&mut self) -> Result<(), RecognitionError> {
        if self.state != RecognitionState::Listening {
            debug!("Recognition stop requested while {:?}", self.state);
            return Ok(());
        }

        info!("Stopping speech recognition ({})", self.engine.name());
        self.engine.stop().map_err(RecognitionError::Engine)
    }

    /// Release the engine unconditionally, dropping anything captured so far
    pub fn abort(&mut self) {
        if self.state == RecognitionState::Listening {
            if let Err(e) = self.engine.stop() {
                warn!("Failed to stop recognition engine: {:#}", e);
            }
        }

        self.clear_buffers();
        if self.state != RecognitionState::Idle {
            self.transition(RecognitionState::Idle);
        }
    }

    /// Apply one engine event
    pub fn handle_event(&mut self, event: RecognitionEvent) -> Option<RecognitionUpdate> {
        if self.state != RecognitionState::Listening {
            debug!("Ignoring recognition event while {:?}: {:?}", self.state, event);
            return None;
        }

        match event {
            RecognitionEvent::Started => {
                debug!("Recognition engine started");
                None
            }
            RecognitionEvent::Result { segments } => {
                let mut interim = String::new();

                for segment in segments {
                    if segment.is_final {
                        let text = segment.text.trim();
                        if !text.is_empty() {
                            self.pending_final.push(text.to_string());
                        }
                    } else {
                        interim.push_str(&segment.text);
                    }
                }

                self.interim_text = interim.trim().to_string();
                Some(RecognitionUpdate::Interim(self.caption()))
            }
            RecognitionEvent::Error { code } => {
                let error = CaptureError::from_code(&code);
                warn!("Speech recognition error: {} ({:?})", code, error);

                self.transition(RecognitionState::Erroring);
                self.clear_buffers();
                self.transition(RecognitionState::Idle);

                Some(RecognitionUpdate::Failed(error))
            }
            RecognitionEvent::Ended => {
                let transcript = if self.pending_final.is_empty() {
                    std::mem::take(&mut self.interim_text)
                } else {
                    self.pending_final.join(" ")
                };

                self.clear_buffers();
                self.transition(RecognitionState::Idle);

                if transcript.is_empty() {
                    info!("Speech recognition ended without a transcript");
                    Some(RecognitionUpdate::Ended)
                } else {
                    info!("Speech recognition committed {} chars", transcript.len());
                    Some(RecognitionUpdate::Committed(transcript))
                }
            }
        }
    }

    fn caption(&self) -> String {
        let mut caption = self.pending_final.join(" ");
        if !self.interim_text.is_empty() {
            if !caption.is_empty() {
                caption.push(' ');
            }
            caption.push_str(&self.interim_text);
        }
        caption
    }

    fn clear_buffers(&mut self) {
        self.interim_text.clear();
        self.pending_final.clear();
    }

    fn transition(&mut self, next: RecognitionState) {
        debug!("Recognition {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
