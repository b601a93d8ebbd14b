use crate::conversation::ContextMessage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which prompt template the assistant service should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCase {
    #[default]
    GeneralChat,
    EarningsPrediction,
    RestOptimization,
}

impl UseCase {
    pub fn as_str(&self) -> &'static str {
        match self {
            UseCase::GeneralChat => "general_chat",
            UseCase::EarningsPrediction => "earnings_prediction",
            UseCase::RestOptimization => "rest_optimization",
        }
    }
}

/// Request body for `POST /api/v1/ai/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,

    pub use_case: UseCase,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub earner_id: Option<String>,

    /// Trailing window of the conversation, oldest first
    pub conversation_history: Vec<ContextMessage>,
}

/// Response body for `POST /api/v1/ai/chat`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,

    /// Canned advice the service returns when its own model is unavailable
    #[serde(default)]
    pub fallback_response: Option<String>,

    #[serde(default)]
    pub error: Option<String>,

    /// Hourly-rate estimate, peer comparison and similar figures
    #[serde(default)]
    pub earner_insights: Option<serde_json::Value>,

    #[serde(default)]
    pub timestamp: Option<String>,

    #[serde(default)]
    pub context_used: bool,
}

impl ChatResponse {
    /// The text to show: the model's reply, else the service's fallback advice
    pub fn reply_text(&self) -> Option<&str> {
        [self.response.as_deref(), self.fallback_response.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }
}

/// `GET /api/v1/ai/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantHealth {
    pub status: String,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub client_initialized: bool,
}

impl AssistantHealth {
    pub fn is_available(&self) -> bool {
        self.status == "healthy"
    }
}

/// `GET /api/v1/ai/chat/examples`: suggested prompts per use case
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatExamples {
    pub examples: BTreeMap<String, Vec<String>>,
}

impl ChatExamples {
    pub fn for_use_case(&self, use_case: UseCase) -> &[String] {
        self.examples
            .get(use_case.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
