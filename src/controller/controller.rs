use super::event::{ControllerEvent, EventSink, UserCommand};
use super::snapshot::{ControllerSnapshot, InteractionPhase};
use crate::conversation::ConversationLog;
use crate::dispatch::{AssistantClient, ChatDispatcher, DispatchResult, UseCase};
use crate::recognition::{
    CaptureError, RecognitionEngine, RecognitionError, RecognitionSession, RecognitionUpdate,
};
use crate::synthesis::{SynthesisEngine, SynthesisSession};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Policy knobs for the interaction controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Number of trailing messages sent along as conversation context
    pub context_window: usize,

    /// Whether replies are read aloud when the controller starts
    pub speech_output_enabled: bool,

    pub use_case: UseCase,

    /// Passed to the assistant for personalized replies
    pub earner_id: Option<String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            context_window: 5,
            speech_output_enabled: true,
            use_case: UseCase::GeneralChat,
            earner_id: None,
        }
    }
}

/// Binds speech capture, speech playback and message dispatch into one
/// interaction policy, and owns the conversation log
pub struct ChatInteractionController {
    config: ControllerConfig,

    log: ConversationLog,

    /// Composed-message buffer
    input: String,

    /// Buffer contents when listening started, restored if nothing is committed
    draft: Option<String>,

    /// Input holds an untouched transcript
    committed: bool,

    recognition: RecognitionSession,

    synthesis: SynthesisSession,

    dispatcher: ChatDispatcher,

    speech_output_enabled: bool,

    use_case: UseCase,

    notice: Option<String>,

    sink: EventSink,

    disposed: bool,
}

impl ChatInteractionController {
    pub fn new(
        config: ControllerConfig,
        recognition: Box<dyn RecognitionEngine>,
        synthesis: Box<dyn SynthesisEngine>,
        client: Arc<dyn AssistantClient>,
        sink: EventSink,
    ) -> Self {
        info!(
            "Creating chat controller (speech output: {}, context window: {})",
            config.speech_output_enabled, config.context_window
        );

        Self {
            log: ConversationLog::new(),
            input: String::new(),
            draft: None,
            committed: false,
            recognition: RecognitionSession::new(recognition),
            synthesis: SynthesisSession::new(synthesis),
            dispatcher: ChatDispatcher::new(client, config.earner_id.clone()),
            speech_output_enabled: config.speech_output_enabled,
            use_case: config.use_case,
            notice: None,
            sink,
            disposed: false,
            config,
        }
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn recognition(&self) -> &RecognitionSession {
        &self.recognition
    }

    pub fn synthesis(&self) -> &SynthesisSession {
        &self.synthesis
    }

    pub fn dispatcher(&self) -> &ChatDispatcher {
        &self.dispatcher
    }

    pub fn speech_output_enabled(&self) -> bool {
        self.speech_output_enabled
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn phase(&self) -> InteractionPhase {
        if self.recognition.is_listening() {
            InteractionPhase::Listening
        } else if !self.dispatcher.is_idle() {
            InteractionPhase::Sending
        } else if self.committed {
            InteractionPhase::Committed
        } else {
            InteractionPhase::Idle
        }
    }

    /// Whether `submit(None)` would send the composed buffer right now
    ///
    /// Covers the buffer only: while listening the buffer is a live caption
    /// and cannot be sent, but `submit(Some(text))` is still accepted as
    /// long as no reply is pending.
    pub fn can_submit(&self) -> bool {
        !self.disposed
            && self.dispatcher.is_idle()
            && !self.recognition.is_listening()
            && !self.input.trim().is_empty()
    }

    /// Apply a user command; returns false when it was ignored
    pub fn apply(&mut self, command: UserCommand) -> bool {
        match command {
            UserCommand::SetInput(text) => self.set_input(text),
            UserCommand::Submit(text) => self.submit(text),
            UserCommand::ToggleListening => self.toggle_listening(),
            UserCommand::ToggleSpeechOutput => {
                self.toggle_speech_output();
                !self.disposed
            }
            UserCommand::SetUseCase(use_case) => self.set_use_case(use_case),
        }
    }

    /// Replace the composed buffer with typed text
    ///
    /// Ignored while listening: the buffer mirrors the live caption then.
    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        if self.disposed {
            return false;
        }
        if self.recognition.is_listening() {
            debug!("Ignoring typed input while listening");
            return false;
        }

        self.input = text.into();
        self.committed = false;
        true
    }

    /// Send `text`, or the composed buffer when `None`
    ///
    /// Silently rejected when the text is blank or a reply is still pending.
    pub fn submit(&mut self, text: Option<String>) -> bool {
        if self.disposed {
            return false;
        }

        let from_buffer = text.is_none();
        if from_buffer && self.recognition.is_listening() {
            debug!("Ignoring submit of the buffer while listening");
            return false;
        }

        let text = text.unwrap_or_else(|| self.input.clone());
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank submit");
            return false;
        }

        let context = self.log.trailing_context(self.config.context_window);

        let pending = match self
            .dispatcher
            .send(&mut self.log, text, self.use_case, context)
        {
            Ok(pending) => pending,
            Err(e) => {
                debug!("Ignoring submit: {}", e);
                return false;
            }
        };

        let sink = self.sink.clone();
        tokio::spawn(async move {
            let completion = pending.await;
            sink.send(ControllerEvent::Dispatch(completion));
        });

        if !self.recognition.is_listening() {
            self.input.clear();
        }
        self.committed = false;
        self.notice = None;
        true
    }

    /// Start capture when idle, or ask the engine to finish when listening
    pub fn toggle_listening(&mut self) -> bool {
        if self.disposed {
            return false;
        }

        if self.recognition.is_listening() {
            if let Err(e) = self.recognition.stop() {
                warn!("Failed to stop listening: {}", e);
                return false;
            }
            return true;
        }

        match self.recognition.start() {
            Ok(()) => {
                self.draft = Some(self.input.clone());
                self.committed = false;
                self.notice = None;
                true
            }
            Err(RecognitionError::AlreadyActive) => {
                debug!("Recognition already active");
                false
            }
            Err(e) => {
                warn!("Failed to start listening: {}", e);
                self.notice = Some(CaptureError::DeviceUnavailable.user_message().to_string());
                false
            }
        }
    }

    /// Flip speech output; disabling silences any reply being read
    pub fn toggle_speech_output(&mut self) {
        if self.disposed {
            return;
        }

        self.speech_output_enabled = !self.speech_output_enabled;
        info!("Speech output enabled: {}", self.speech_output_enabled);

        if !self.speech_output_enabled {
            self.synthesis.cancel();
        }
    }

    pub fn set_use_case(&mut self, use_case: UseCase) -> bool {
        if self.disposed {
            return false;
        }

        self.use_case = use_case;
        true
    }

    /// Apply one asynchronous event
    pub fn handle_event(&mut self, event: ControllerEvent) {
        if self.disposed {
            debug!("Controller disposed, ignoring {:?}", event);
            return;
        }

        match event {
            ControllerEvent::Recognition(event) => {
                if let Some(update) = self.recognition.handle_event(event) {
                    self.apply_recognition_update(update);
                }
            }
            ControllerEvent::Synthesis(event) => self.synthesis.handle_event(event),
            ControllerEvent::Dispatch(completion) => {
                match self.dispatcher.complete(&mut self.log, completion) {
                    DispatchResult::Replied(_) if self.speech_output_enabled => {
                        if let Some(reply) = self.log.last() {
                            self.synthesis.speak(&reply.content);
                        }
                    }
                    DispatchResult::Replied(_)
                    | DispatchResult::Failed(_)
                    | DispatchResult::Ignored => {}
                }
            }
        }
    }

    fn apply_recognition_update(&mut self, update: RecognitionUpdate) {
        match update {
            RecognitionUpdate::Interim(caption) => {
                self.input = if caption.is_empty() {
                    self.draft.clone().unwrap_or_default()
                } else {
                    caption
                };
            }
            RecognitionUpdate::Committed(transcript) => {
                self.draft = None;
                self.input = transcript;
                self.committed = true;
            }
            RecognitionUpdate::Ended => {
                self.input = self.draft.take().unwrap_or_default();
            }
            RecognitionUpdate::Failed(error) => {
                self.input = self.draft.take().unwrap_or_default();
                self.notice = Some(error.user_message().to_string());
            }
        }
    }

    /// Release capture and playback regardless of their state
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        info!("Disposing chat controller");
        self.recognition.abort();
        self.synthesis.cancel();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            messages: self.log.messages().to_vec(),
            input: self.input.clone(),
            phase: self.phase(),
            recognition: self.recognition.state(),
            synthesis: self.synthesis.state(),
            dispatch: self.dispatcher.state(),
            speech_output_enabled: self.speech_output_enabled,
            use_case: self.use_case,
            notice: self.notice.clone(),
            can_submit: self.can_submit(),
        }
    }
}

impl Drop for ChatInteractionController {
    fn drop(&mut self) {
        self.dispose();
    }
}
