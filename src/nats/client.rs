use anyhow::{Context, Result};
use async_nats::Client;
use serde::Serialize;
use tracing::{debug, info};

/// NATS connection to the speech service, scoped to one speech session
pub struct SpeechBridge {
    client: Client,
    session_id: String,
}

impl SpeechBridge {
    /// Connect to NATS server
    pub async fn connect(url: &str, session_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully (speech session {})", session_id);

        Ok(Self { client, session_id })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn recognition_command_subject(&self) -> String {
        format!("speech.recognition.{}.command", self.session_id)
    }

    pub fn recognition_event_subject(&self) -> String {
        format!("speech.recognition.{}.event", self.session_id)
    }

    pub fn synthesis_command_subject(&self) -> String {
        format!("speech.synthesis.{}.command", self.session_id)
    }

    pub fn synthesis_event_subject(&self) -> String {
        format!("speech.synthesis.{}.event", self.session_id)
    }

    /// Publish a JSON payload
    pub async fn publish_json<T: Serialize>(&self, subject: String, message: &T) -> Result<()> {
        let payload = serde_json::to_vec(message)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish speech command")?;

        debug!("Published speech command to {}", subject);
        Ok(())
    }

    pub async fn subscribe(&self, subject: String) -> Result<async_nats::Subscriber> {
        info!("Subscribing to speech events on {}", subject);

        let subscriber = self
            .client
            .subscribe(subject)
            .await
            .context("Failed to subscribe to speech events")?;

        Ok(subscriber)
    }
}
