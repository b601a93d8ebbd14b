// Tests for the interaction policy binding capture, playback and dispatch
//
// Each test drives the controller the way the runtime does: user commands
// are applied directly and asynchronous completions are pumped from the
// event channel one at a time.

mod common;

use common::{Harness, RecognitionCall, ScriptedAssistant, SynthesisCall};
use driver_copilot::controller::{
    spawn_controller, ControllerConfig, ControllerEvent, InteractionPhase,
};
use driver_copilot::conversation::Sender;
use driver_copilot::dispatch::{ChatResponse, DispatchState, UseCase, ASSISTANT_UNAVAILABLE_MESSAGE};
use driver_copilot::recognition::{CaptureError, RecognitionEvent, RecognitionState, Segment};
use driver_copilot::synthesis::{SynthesisEvent, SynthesisState};
use serde_json::json;
use std::time::Duration;

fn recognition(event: RecognitionEvent) -> ControllerEvent {
    ControllerEvent::Recognition(event)
}

fn interim(text: &str) -> ControllerEvent {
    recognition(RecognitionEvent::Result {
        segments: vec![Segment::interim(text)],
    })
}

fn finalized(text: &str) -> ControllerEvent {
    recognition(RecognitionEvent::Result {
        segments: vec![Segment::finalized(text)],
    })
}

#[tokio::test]
async fn test_rapid_double_submit_sends_once() {
    let mut h = Harness::new(ScriptedAssistant::default().reply("Sure"));

    h.controller.set_input("How much have I earned?");
    assert!(h.controller.submit(None));
    assert!(!h.controller.submit(Some("How much have I earned?".to_string())));

    assert_eq!(h.controller.log().len(), 1);
    assert_eq!(h.controller.phase(), InteractionPhase::Sending);
    assert!(!h.controller.can_submit());

    h.pump().await;

    assert_eq!(h.assistant.requests().len(), 1);
    assert_eq!(h.controller.log().len(), 2);
    assert_eq!(h.controller.dispatcher().state(), DispatchState::Idle);
}

#[tokio::test]
async fn test_backend_failure_leaves_conversation_usable() {
    let mut h = Harness::new(
        ScriptedAssistant::default()
            .fail("Assistant request failed with status: 500 Internal Server Error")
            .reply("Try the airport after 6pm"),
    );

    assert!(h.controller.submit(Some("Where should I go?".to_string())));
    h.pump().await;

    let messages = h.controller.log().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert!(!messages[0].is_error);
    assert_eq!(messages[1].sender, Sender::Assistant);
    assert!(messages[1].is_error);
    assert_eq!(messages[1].content, ASSISTANT_UNAVAILABLE_MESSAGE);
    assert_eq!(h.controller.dispatcher().state(), DispatchState::Idle);

    // Error notices are never read aloud
    assert!(h.synthesis.calls().is_empty());

    assert!(h.controller.submit(Some("Where should I go now?".to_string())));
    h.pump().await;
    assert_eq!(h.controller.log().last().unwrap().content, "Try the airport after 6pm");
}

#[tokio::test]
async fn test_reply_is_spoken_sanitized_then_returns_idle() {
    let mut h = Harness::new(ScriptedAssistant::default().reply_with(ChatResponse {
        response: Some("Go online now 🚗✨".to_string()),
        earner_insights: Some(json!({"predicted_hourly_earnings": 24.1})),
        ..Default::default()
    }));

    h.controller.submit(Some("Should I start driving?".to_string()));
    assert_eq!(h.controller.synthesis().state(), SynthesisState::Idle);

    h.pump().await;

    assert_eq!(h.controller.synthesis().state(), SynthesisState::Speaking);
    assert_eq!(h.synthesis.spoken(), vec!["Go online now".to_string()]);
    // The log keeps the reply verbatim
    assert_eq!(h.controller.log().last().unwrap().content, "Go online now 🚗✨");

    let utterance = h.controller.synthesis().current_utterance().unwrap();
    h.controller
        .handle_event(ControllerEvent::Synthesis(SynthesisEvent::Started { utterance }));
    h.controller
        .handle_event(ControllerEvent::Synthesis(SynthesisEvent::Ended { utterance }));

    assert_eq!(h.controller.synthesis().state(), SynthesisState::Idle);
}

#[tokio::test]
async fn test_disabling_speech_output_cancels_mid_utterance() {
    let mut h = Harness::new(ScriptedAssistant::default().reply("Peak hours start at 5pm"));

    h.controller.submit(Some("When is peak?".to_string()));
    h.pump().await;
    assert_eq!(h.controller.synthesis().state(), SynthesisState::Speaking);

    h.controller.toggle_speech_output();

    assert!(!h.controller.speech_output_enabled());
    assert_eq!(h.controller.synthesis().state(), SynthesisState::Idle);
    assert_eq!(h.synthesis.calls().last(), Some(&SynthesisCall::Cancel));
}

#[tokio::test]
async fn test_reenabling_speech_output_does_not_replay() {
    let config = ControllerConfig {
        speech_output_enabled: false,
        ..Default::default()
    };
    let mut h = Harness::with_config(
        config,
        ScriptedAssistant::default().reply("first").reply("second"),
    );

    h.controller.submit(Some("one".to_string()));
    h.pump().await;
    assert!(h.synthesis.calls().is_empty());

    h.controller.toggle_speech_output();
    assert!(h.synthesis.calls().is_empty());

    h.controller.submit(Some("two".to_string()));
    h.pump().await;
    assert_eq!(h.synthesis.spoken(), vec!["second".to_string()]);
}

#[tokio::test]
async fn test_spoken_transcript_is_committed_without_sending() {
    let mut h = Harness::new(ScriptedAssistant::default());

    assert!(h.controller.toggle_listening());
    h.controller.handle_event(recognition(RecognitionEvent::Started));
    h.controller.handle_event(interim("how"));
    assert_eq!(h.controller.input(), "how");
    h.controller.handle_event(interim("how much"));
    h.controller.handle_event(interim("how much have I"));
    assert_eq!(h.controller.input(), "how much have I");
    h.controller.handle_event(finalized("how much have I earned"));

    assert!(h.controller.toggle_listening());
    assert_eq!(h.controller.recognition().state(), RecognitionState::Listening);
    h.controller.handle_event(recognition(RecognitionEvent::Ended));

    assert_eq!(h.controller.input(), "how much have I earned");
    assert_eq!(h.controller.phase(), InteractionPhase::Committed);
    assert!(h.controller.can_submit());
    assert!(h.controller.log().is_empty());
    assert!(h.assistant.requests().is_empty());
    assert_eq!(
        h.recognition.calls(),
        vec![RecognitionCall::Start, RecognitionCall::Stop]
    );
}

#[tokio::test]
async fn test_typing_is_ignored_while_listening() {
    let mut h = Harness::new(ScriptedAssistant::default());
    h.controller.set_input("typed draft");

    h.controller.toggle_listening();
    assert!(!h.controller.set_input("typed over the caption"));
    assert_eq!(h.controller.input(), "typed draft");

    h.controller.handle_event(interim("spoken"));
    assert!(!h.controller.set_input("another edit"));
    assert_eq!(h.controller.input(), "spoken");

    // Submitting the buffer while it mirrors the caption is rejected too
    assert!(!h.controller.submit(None));
    assert!(!h.controller.can_submit());
}

#[tokio::test]
async fn test_capture_error_restores_draft_and_shows_notice() {
    let mut h = Harness::new(ScriptedAssistant::default());
    h.controller.set_input("typed draft");

    h.controller.toggle_listening();
    h.controller.handle_event(finalized("half of a"));
    h.controller.handle_event(recognition(RecognitionEvent::Error {
        code: "not-allowed".to_string(),
    }));

    assert_eq!(h.controller.recognition().state(), RecognitionState::Idle);
    assert_eq!(h.controller.input(), "typed draft");
    assert_eq!(
        h.controller.notice(),
        Some(CaptureError::PermissionDenied.user_message())
    );

    // Retrying clears the notice
    assert!(h.controller.toggle_listening());
    assert_eq!(h.controller.notice(), None);
}

#[tokio::test]
async fn test_nothing_heard_restores_draft() {
    let mut h = Harness::new(ScriptedAssistant::default());
    h.controller.set_input("typed draft");

    h.controller.toggle_listening();
    h.controller.handle_event(recognition(RecognitionEvent::Ended));

    assert_eq!(h.controller.input(), "typed draft");
    assert_eq!(h.controller.phase(), InteractionPhase::Idle);
}

#[tokio::test]
async fn test_blank_submit_is_rejected() {
    let mut h = Harness::new(ScriptedAssistant::default());

    h.controller.set_input("   \n\t ");
    assert!(!h.controller.can_submit());
    assert!(!h.controller.submit(None));
    assert!(!h.controller.submit(Some(String::new())));

    assert!(h.controller.log().is_empty());
    assert_eq!(h.controller.dispatcher().state(), DispatchState::Idle);
}

#[tokio::test]
async fn test_submit_trims_and_clears_buffer() {
    let mut h = Harness::new(ScriptedAssistant::default().reply("ok"));
    h.controller.set_input("  When should I rest?  ");

    assert!(h.controller.submit(None));

    assert_eq!(h.controller.input(), "");
    assert_eq!(h.controller.log().messages()[0].content, "When should I rest?");
    h.pump().await;
    assert_eq!(h.assistant.requests()[0].message, "When should I rest?");
}

#[tokio::test]
async fn test_message_ids_strictly_increase_across_sends() {
    let mut assistant = ScriptedAssistant::default();
    for i in 0..5 {
        assistant = if i == 2 {
            assistant.fail("timeout")
        } else {
            assistant.reply("noted")
        };
    }
    let mut h = Harness::new(assistant);

    for i in 0..5 {
        assert!(h.controller.submit(Some(format!("message {}", i))));
        h.pump().await;
    }

    let ids: Vec<u64> = h.controller.log().messages().iter().map(|m| m.id.0).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_context_window_excludes_current_message() {
    let config = ControllerConfig {
        context_window: 2,
        earner_id: Some("E10042".to_string()),
        ..Default::default()
    };
    let mut h = Harness::with_config(
        config,
        ScriptedAssistant::default().reply("a").reply("b"),
    );

    h.controller.submit(Some("first".to_string()));
    h.pump().await;
    h.controller.set_use_case(UseCase::RestOptimization);
    h.controller.submit(Some("second".to_string()));
    h.pump().await;

    let requests = h.assistant.requests();
    assert!(requests[0].conversation_history.is_empty());

    let history: Vec<&str> = requests[1]
        .conversation_history
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(history, vec!["first", "a"]);
    assert_eq!(requests[1].message, "second");
    assert_eq!(requests[1].use_case, UseCase::RestOptimization);
    assert_eq!(requests[1].earner_id.as_deref(), Some("E10042"));
}

#[tokio::test]
async fn test_listening_and_sending_overlap() {
    let mut h = Harness::new(ScriptedAssistant::default().reply("Reply while you talk"));

    h.controller.submit(Some("first question".to_string()));
    assert!(h.controller.toggle_listening());
    h.controller.handle_event(interim("follow"));

    h.pump().await;

    assert_eq!(h.controller.log().len(), 2);
    assert_eq!(h.controller.input(), "follow");
    assert_eq!(h.controller.recognition().state(), RecognitionState::Listening);
    assert_eq!(h.controller.synthesis().state(), SynthesisState::Speaking);
}

#[tokio::test]
async fn test_can_submit_tracks_the_composed_buffer_only() {
    let mut h = Harness::new(ScriptedAssistant::default().reply("Sure"));
    h.controller.set_input("typed draft");
    assert!(h.controller.can_submit());

    assert!(h.controller.toggle_listening());
    h.controller.handle_event(interim("spoken words"));

    // The buffer is a live caption now and cannot be sent
    assert!(!h.controller.can_submit());
    assert!(!h.controller.snapshot().can_submit);
    assert!(!h.controller.submit(None));
    assert_eq!(h.controller.log().len(), 0);

    // Explicit text bypasses the buffer and is sent
    assert!(h.controller.submit(Some("quick question".to_string())));
    assert_eq!(h.controller.log().messages()[0].content, "quick question");
    assert_eq!(h.controller.input(), "spoken words");

    h.pump().await;
    assert_eq!(h.controller.log().len(), 2);
}

#[tokio::test]
async fn test_engine_refusing_to_start_sets_notice() {
    let mut h = Harness::new(ScriptedAssistant::default());
    // Swap in a controller whose engine cannot start
    let engine = common::RecordingRecognitionEngine {
        fail_start: true,
        ..Default::default()
    };
    let (sink, _events) = driver_copilot::controller::EventSink::channel();
    h.controller = driver_copilot::controller::ChatInteractionController::new(
        ControllerConfig::default(),
        Box::new(engine),
        Box::new(h.synthesis.clone()),
        std::sync::Arc::new(h.assistant.clone()),
        sink,
    );

    assert!(!h.controller.toggle_listening());
    assert_eq!(h.controller.recognition().state(), RecognitionState::Idle);
    assert_eq!(
        h.controller.notice(),
        Some(CaptureError::DeviceUnavailable.user_message())
    );
}

#[tokio::test]
async fn test_dispose_releases_capture_and_playback() {
    let mut h = Harness::new(ScriptedAssistant::default().reply("Goodbye"));

    h.controller.submit(Some("bye".to_string()));
    h.pump().await;
    h.controller.toggle_listening();

    h.controller.dispose();
    h.controller.dispose();

    assert_eq!(h.controller.recognition().state(), RecognitionState::Idle);
    assert_eq!(h.controller.synthesis().state(), SynthesisState::Idle);
    assert_eq!(
        h.recognition.calls(),
        vec![RecognitionCall::Start, RecognitionCall::Stop]
    );
    assert_eq!(h.synthesis.cancel_count(), 1);

    // Everything after disposal is a no-op
    assert!(!h.controller.toggle_listening());
    assert!(!h.controller.submit(Some("hello?".to_string())));
    assert_eq!(h.recognition.calls().len(), 2);
}

#[tokio::test]
async fn test_dispose_while_idle_touches_nothing() {
    let mut h = Harness::new(ScriptedAssistant::default());

    h.controller.dispose();

    assert!(h.recognition.calls().is_empty());
    assert!(h.synthesis.calls().is_empty());
    assert!(h.controller.is_disposed());
}

#[tokio::test]
async fn test_runtime_serves_commands_and_publishes_state() {
    let h = Harness::new(ScriptedAssistant::default().reply("You are 12% above the city average"));
    let synthesis = h.synthesis.clone();
    let handle = spawn_controller(h.controller, h.events);

    let reply = handle.submit(Some("How am I doing?".to_string())).await.unwrap();
    assert!(reply.accepted);
    assert_eq!(reply.state.messages.len(), 1);

    let mut states = handle.subscribe();
    let state = tokio::time::timeout(
        Duration::from_secs(2),
        states.wait_for(|s| s.messages.len() == 2),
    )
    .await
    .expect("reply not published in time")
    .unwrap()
    .clone();

    assert_eq!(state.dispatch, DispatchState::Idle);
    assert_eq!(state.synthesis, SynthesisState::Speaking);
    assert_eq!(
        synthesis.spoken(),
        vec!["You are 12% above the city average".to_string()]
    );

    handle.shutdown().await;

    let final_state = handle.snapshot();
    assert_eq!(final_state.synthesis, SynthesisState::Idle);
    assert!(handle.toggle_listening().await.is_err());
}
