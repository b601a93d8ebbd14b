// Shared test doubles for the speech engines and the assistant service.
//
// Engines record every command they receive so tests can assert on exactly
// what reached the platform side.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use driver_copilot::controller::{ChatInteractionController, ControllerConfig, ControllerEvent, EventSink};
use driver_copilot::dispatch::{
    AssistantClient, AssistantHealth, ChatExamples, ChatRequest, ChatResponse,
};
use driver_copilot::recognition::RecognitionEngine;
use driver_copilot::synthesis::{SynthesisEngine, UtteranceId};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionCall {
    Start,
    Stop,
}

#[derive(Clone, Default)]
pub struct RecordingRecognitionEngine {
    pub calls: Arc<Mutex<Vec<RecognitionCall>>>,
    pub fail_start: bool,
}

impl RecordingRecognitionEngine {
    pub fn calls(&self) -> Vec<RecognitionCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl RecognitionEngine for RecordingRecognitionEngine {
    fn start(&mut self) -> Result<()> {
        if self.fail_start {
            return Err(anyhow!("speech recognition not supported"));
        }
        self.calls.lock().unwrap().push(RecognitionCall::Start);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.calls.lock().unwrap().push(RecognitionCall::Stop);
        Ok(())
    }

    fn name(&self) -> &str {
        "recording-recognition"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisCall {
    Speak(UtteranceId, String),
    Cancel,
}

#[derive(Clone, Default)]
pub struct RecordingSynthesisEngine {
    pub calls: Arc<Mutex<Vec<SynthesisCall>>>,
}

impl RecordingSynthesisEngine {
    pub fn calls(&self) -> Vec<SynthesisCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SynthesisCall::Speak(_, text) => Some(text),
                SynthesisCall::Cancel => None,
            })
            .collect()
    }

    pub fn cancel_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == SynthesisCall::Cancel)
            .count()
    }
}

impl SynthesisEngine for RecordingSynthesisEngine {
    fn speak(&mut self, utterance: UtteranceId, text: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(SynthesisCall::Speak(utterance, text.to_string()));
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        self.calls.lock().unwrap().push(SynthesisCall::Cancel);
        Ok(())
    }

    fn name(&self) -> &str {
        "recording-synthesis"
    }
}

/// Assistant that answers from a script and records every request
#[derive(Clone, Default)]
pub struct ScriptedAssistant {
    replies: Arc<Mutex<VecDeque<Result<ChatResponse, String>>>>,
    pub requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ScriptedAssistant {
    pub fn reply(self, text: &str) -> Self {
        self.reply_with(ChatResponse {
            response: Some(text.to_string()),
            ..Default::default()
        })
    }

    pub fn reply_with(self, response: ChatResponse) -> Self {
        self.replies.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, error: &str) -> Self {
        self.replies.lock().unwrap().push_back(Err(error.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AssistantClient for ScriptedAssistant {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);

        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(error)) => Err(anyhow!(error)),
            None => Err(anyhow!("no scripted reply left")),
        }
    }

    async fn health(&self) -> Result<AssistantHealth> {
        Ok(AssistantHealth {
            status: "healthy".to_string(),
            model: Some("scripted".to_string()),
            client_initialized: true,
        })
    }

    async fn chat_examples(&self) -> Result<ChatExamples> {
        Err(anyhow!("examples unavailable"))
    }
}

/// A controller wired to recording engines and a scripted assistant
pub struct Harness {
    pub controller: ChatInteractionController,
    pub events: mpsc::UnboundedReceiver<ControllerEvent>,
    pub recognition: RecordingRecognitionEngine,
    pub synthesis: RecordingSynthesisEngine,
    pub assistant: ScriptedAssistant,
}

impl Harness {
    pub fn new(assistant: ScriptedAssistant) -> Self {
        Self::with_config(ControllerConfig::default(), assistant)
    }

    pub fn with_config(config: ControllerConfig, assistant: ScriptedAssistant) -> Self {
        let recognition = RecordingRecognitionEngine::default();
        let synthesis = RecordingSynthesisEngine::default();
        let (sink, events) = EventSink::channel();

        let controller = ChatInteractionController::new(
            config,
            Box::new(recognition.clone()),
            Box::new(synthesis.clone()),
            Arc::new(assistant.clone()),
            sink,
        );

        Self {
            controller,
            events,
            recognition,
            synthesis,
            assistant,
        }
    }

    /// Deliver the next queued event (e.g. a dispatch completion) to the controller
    pub async fn pump(&mut self) {
        let event = self.events.recv().await.expect("event channel closed");
        self.controller.handle_event(event);
    }
}
