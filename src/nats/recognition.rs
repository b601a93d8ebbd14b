use super::client::SpeechBridge;
use super::messages::{RecognitionCommand, RecognitionCommandMessage, RecognitionEventMessage};
use crate::controller::EventSink;
use crate::recognition::{RecognitionEngine, RecognitionEvent};
use anyhow::{anyhow, Result};
use chrono::Utc;
use futures::stream::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Speech-to-text engine living in the speech service, reached over NATS
pub struct NatsRecognitionEngine {
    commands: mpsc::UnboundedSender<RecognitionCommand>,
}

impl NatsRecognitionEngine {
    /// Subscribe to engine events and start the command publisher
    pub async fn connect(bridge: Arc<SpeechBridge>, sink: EventSink) -> Result<Self> {
        let mut subscriber = bridge.subscribe(bridge.recognition_event_subject()).await?;

        let session_id = bridge.session_id().to_string();
        let events_sink = sink.clone();
        tokio::spawn(async move {
            info!("Recognition event task started");

            while let Some(msg) = subscriber.next().await {
                match serde_json::from_slice::<RecognitionEventMessage>(&msg.payload) {
                    Ok(message) => {
                        if message.session_id != session_id {
                            continue;
                        }
                        events_sink.recognition(message.event);
                    }
                    Err(e) => {
                        warn!("Failed to parse recognition event: {}", e);
                    }
                }
            }

            info!("Recognition event task stopped");
        });

        let (tx, mut rx) = mpsc::unbounded_channel::<RecognitionCommand>();
        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                let message = RecognitionCommandMessage {
                    session_id: bridge.session_id().to_string(),
                    command,
                    timestamp: Utc::now().to_rfc3339(),
                };

                if let Err(e) = bridge
                    .publish_json(bridge.recognition_command_subject(), &message)
                    .await
                {
                    error!("Failed to publish recognition {:?}: {:#}", command, e);
                    // The engine will never answer; end the capture from our side.
                    sink.recognition(RecognitionEvent::Error {
                        code: "network".to_string(),
                    });
                }
            }
        });

        Ok(Self { commands: tx })
    }

    fn enqueue(&self, command: RecognitionCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("Recognition command publisher has stopped"))
    }
}

impl RecognitionEngine for NatsRecognitionEngine {
    fn start(&mut self) -> Result<()> {
        self.enqueue(RecognitionCommand::Start)
    }

    fn stop(&mut self) -> Result<()> {
        self.enqueue(RecognitionCommand::Stop)
    }

    fn name(&self) -> &str {
        "nats-recognition"
    }
}
