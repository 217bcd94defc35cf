use crate::error::AgentError;
use crate::models::ChatMessage;
use crate::traits::ChatModel;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DEFAULT_CHAT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.groq.com/openai/v1";

const MODEL_ENV: &str = "GROQ_MODEL";
const ENDPOINT_ENV: &str = "GROQ_API_URL";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.0,
            api_key: None,
        }
    }
}

impl LlmConfig {
    /// Read the configuration from the environment. A missing or blank
    /// API key is allowed here: callers warn about it and every completion
    /// attempt then fails with [`AgentError::NotConfigured`] instead of
    /// the process refusing to start.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok().and_then(|value| {
            let key = value.trim().to_string();
            if key.is_empty() {
                None
            } else {
                Some(key)
            }
        });

        let model = env_or(MODEL_ENV, DEFAULT_CHAT_MODEL);
        let endpoint = env_or(ENDPOINT_ENV, DEFAULT_CHAT_ENDPOINT);

        Self {
            endpoint,
            model,
            temperature: 0.0,
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

fn env_or(name: &str, fallback: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat-completion client for Groq's OpenAI-compatible API.
pub struct GroqClient {
    client: Client,
    config: LlmConfig,
}

impl GroqClient {
    pub fn new(config: LlmConfig) -> Result<Self, AgentError> {
        Url::parse(&config.endpoint)?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let config = LlmConfig {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            ..config
        };

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, AgentError> {
        Self::new(LlmConfig::from_env())
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint)
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AgentError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            AgentError::NotConfigured(format!("{API_KEY_ENV} is not set"))
        })?;

        let payload = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AgentError::BackendResponse {
                provider: "groq".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AgentError::BackendResponse {
                provider: "groq".to_string(),
                details: "completion had no message content".to_string(),
            })
    }
}
