use crate::controller::ControllerConfig;
use crate::dispatch::UseCase;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub assistant: AssistantConfig,
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
    /// Origins allowed to call the HTTP API from a browser
    pub cors_origins: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "driver-copilot".to_string(),
            http: HttpConfig::default(),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Base URL of the assistant service (without the /api/v1 prefix)
    pub base_url: String,
    pub earner_id: Option<String>,
    pub use_case: UseCase,
    pub timeout_secs: u64,
    /// Trailing messages sent as conversation context
    pub context_window: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            earner_id: None,
            use_case: UseCase::GeneralChat,
            timeout_secs: 30,
            context_window: 5,
        }
    }
}

impl AssistantConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Read assistant replies aloud at startup
    pub output_enabled: bool,
    pub nats_url: String,
    /// Speech session id shared with the speech service (generated when unset)
    pub session_id: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            output_enabled: true,
            nats_url: "nats://localhost:4222".to_string(),
            session_id: None,
        }
    }
}

impl Config {
    /// Load from a config file (any format the `config` crate knows) with
    /// `COPILOT__SECTION__KEY` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("COPILOT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read config {}", path))?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            context_window: self.assistant.context_window,
            speech_output_enabled: self.speech.output_enabled,
            use_case: self.assistant.use_case,
            earner_id: self.assistant.earner_id.clone(),
        }
    }
}
