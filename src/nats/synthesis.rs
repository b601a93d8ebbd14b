use super::client::SpeechBridge;
use super::messages::{SynthesisCommand, SynthesisCommandMessage, SynthesisEventMessage};
use crate::controller::EventSink;
use crate::synthesis::{SynthesisEngine, SynthesisEvent, UtteranceId};
use anyhow::{anyhow, Result};
use chrono::Utc;
use futures::stream::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Text-to-speech engine living in the speech service, reached over NATS
///
/// Commands are queued in call order, so a `cancel` always reaches the
/// service before the `speak` that supersedes it.
pub struct NatsSynthesisEngine {
    commands: mpsc::UnboundedSender<SynthesisCommand>,
}

impl NatsSynthesisEngine {
    pub async fn connect(bridge: Arc<SpeechBridge>, sink: EventSink) -> Result<Self> {
        let mut subscriber = bridge.subscribe(bridge.synthesis_event_subject()).await?;

        let session_id = bridge.session_id().to_string();
        let events_sink = sink.clone();
        tokio::spawn(async move {
            info!("Synthesis event task started");

            while let Some(msg) = subscriber.next().await {
                match serde_json::from_slice::<SynthesisEventMessage>(&msg.payload) {
                    Ok(message) if message.session_id == session_id => {
                        events_sink.synthesis(message.event);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Failed to parse synthesis event: {}", e);
                    }
                }
            }

            info!("Synthesis event task stopped");
        });

        let (tx, mut rx) = mpsc::unbounded_channel::<SynthesisCommand>();
        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                let utterance = match &command {
                    SynthesisCommand::Speak { utterance, .. } => Some(*utterance),
                    SynthesisCommand::Cancel => None,
                };

                let message = SynthesisCommandMessage {
                    session_id: bridge.session_id().to_string(),
                    command,
                    timestamp: Utc::now().to_rfc3339(),
                };

                if let Err(e) = bridge
                    .publish_json(bridge.synthesis_command_subject(), &message)
                    .await
                {
                    error!("Failed to publish synthesis command: {:#}", e);
                    if let Some(utterance) = utterance {
                        sink.synthesis(SynthesisEvent::Error { utterance });
                    }
                }
            }
        });

        Ok(Self { commands: tx })
    }

    fn enqueue(&self, command: SynthesisCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("Synthesis command publisher has stopped"))
    }
}

impl SynthesisEngine for NatsSynthesisEngine {
    fn speak(&mut self, utterance: UtteranceId, text: &str) -> Result<()> {
        self.enqueue(SynthesisCommand::Speak {
            utterance,
            text: text.to_string(),
        })
    }

    fn cancel(&mut self) -> Result<()> {
        self.enqueue(SynthesisCommand::Cancel)
    }

    fn name(&self) -> &str {
        "nats-synthesis"
    }
}
