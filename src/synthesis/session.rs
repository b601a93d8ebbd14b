use super::engine::{SynthesisEngine, SynthesisEvent, UtteranceId};
use super::sanitize::sanitize_for_speech;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisState {
    Idle,
    Speaking,
}

/// Single-flight playback of assistant replies
pub struct SynthesisSession {
    engine: Box<dyn SynthesisEngine>,
    state: SynthesisState,
    current: Option<UtteranceId>,
    next_utterance: u64,
}

impl SynthesisSession {
    pub fn new(engine: Box<dyn SynthesisEngine>) -> Self {
        Self {
            engine,
            state: SynthesisState::Idle,
            current: None,
            next_utterance: 0,
        }
    }

    pub fn state(&self) -> SynthesisState {
        self.state
    }

    pub fn current_utterance(&self) -> Option<UtteranceId> {
        self.current
    }

    /// Speak `text`, superseding whatever is playing
    ///
    /// Whatever is playing stops even when the new text has nothing
    /// speakable. Returns `None` when nothing was handed to the engine,
    /// either because the sanitized text is empty or because the engine
    /// refused it.
    pub fn speak(&mut self, text: &str) -> Option<UtteranceId> {
        self.cancel();

        let text = sanitize_for_speech(text);
        if text.is_empty() {
            debug!("Nothing speakable left after sanitizing");
            return None;
        }

        self.next_utterance += 1;
        let utterance = UtteranceId(self.next_utterance);

        if let Err(e) = self.engine.speak(utterance, &text) {
            warn!("Speech synthesis failed to start ({}): {:#}", self.engine.name(), e);
            return None;
        }

        info!("Speaking {} ({} chars)", utterance, text.len());
        self.current = Some(utterance);
        self.state = SynthesisState::Speaking;
        Some(utterance)
    }

    /// Stop playback; a no-op when idle
    pub fn cancel(&mut self) {
        if self.state == SynthesisState::Idle {
            return;
        }

        if let Err(e) = self.engine.cancel() {
            warn!("Speech synthesis cancel failed ({}): {:#}", self.engine.name(), e);
        }

        debug!("Cancelled {:?}", self.current);
        self.current = None;
        self.state = SynthesisState::Idle;
    }

    /// Apply one engine event; events for superseded utterances are ignored
    pub fn handle_event(&mut self, event: SynthesisEvent) {
        if self.current != Some(event.utterance()) {
            debug!("Ignoring stale synthesis event: {:?}", event);
            return;
        }

        match event {
            SynthesisEvent::Started { utterance } => {
                debug!("Engine started {}", utterance);
            }
            SynthesisEvent::Ended { utterance } => {
                debug!("Finished {}", utterance);
                self.current = None;
                self.state = SynthesisState::Idle;
            }
            SynthesisEvent::Error { utterance } => {
                warn!("Playback of {} failed; skipping", utterance);
                self.current = None;
                self.state = SynthesisState::Idle;
            }
        }
    }
}
