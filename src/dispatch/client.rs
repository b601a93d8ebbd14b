use super::messages::{AssistantHealth, ChatExamples, ChatRequest, ChatResponse};
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Remote assistant service
///
/// Treated as an opaque request/response service: any transport failure or
/// non-success status is an error, and callers decide how to absorb it.
#[async_trait::async_trait]
pub trait AssistantClient: Send + Sync {
    /// Send one chat message with its conversation context
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Report whether the service's model backend is configured
    async fn health(&self) -> Result<AssistantHealth>;

    /// Suggested prompts grouped by use case
    async fn chat_examples(&self) -> Result<ChatExamples>;
}

/// `AssistantClient` over the service's HTTP API
#[derive(Clone)]
pub struct HttpAssistantClient {
    client: Client,
    base_url: String,
}

impl HttpAssistantClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        info!("Assistant service at {}", base_url);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/ai{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl AssistantClient for HttpAssistantClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = self.url("/chat");

        debug!(
            "POST {} (use_case={:?}, history={})",
            url,
            request.use_case,
            request.conversation_history.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Assistant request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Assistant request failed with status: {}",
                response.status()
            ));
        }

        response
            .json::<ChatResponse>()
            .await
            .context("Failed to parse assistant response")
    }

    async fn health(&self) -> Result<AssistantHealth> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .context("Assistant health check failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("Assistant health check failed: {}", response.status()));
        }

        Ok(response.json().await?)
    }

    async fn chat_examples(&self) -> Result<ChatExamples> {
        let response = self
            .client
            .get(self.url("/chat/examples"))
            .send()
            .await
            .context("Failed to fetch chat examples")?;

        if !response.status().is_success() {
            return Err(anyhow!("Failed to fetch chat examples: {}", response.status()));
        }

        Ok(response.json().await?)
    }
}
