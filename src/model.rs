//! Model provider for scenario generation
//!
//! One-shot textual transform: prompt in, scenario text out. No state is
//! carried between calls, so repeated invocations are independent.
//!
//! - [`ClaudeModel`] - production provider using the Anthropic Messages API
//! - [`MockModel`] - test provider with configurable responses

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::TransportConfig;
use crate::error::FigspecError;

/// Anthropic Messages API endpoint
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Messages API revision header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Generation ceiling for a full scenario document
const MAX_TOKENS: u32 = 4000;

/// Sampling parameters for scenario generation
const TEMPERATURE: f32 = 0.3;
const TOP_P: f32 = 0.9;

/// Trait all scenario-generating model providers implement
#[async_trait]
pub trait ScenarioModel: Send + Sync {
    /// Provider name (e.g. "claude", "mock")
    fn name(&self) -> &str;

    /// Execute a one-shot prompt and return the generated text
    async fn generate(&self, prompt: &str) -> Result<String, FigspecError>;

    /// Whether the provider has what it needs to run (e.g. API key set)
    fn is_available(&self) -> bool {
        true
    }
}

/// Claude provider using the Anthropic Messages API
pub struct ClaudeModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ClaudeModel {
    /// Create a provider from a static API key and transport settings
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        transport: TransportConfig,
    ) -> Result<Self, FigspecError> {
        Ok(Self {
            client: transport.client()?,
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_API_URL.to_string(),
        })
    }

    /// Override the API endpoint URL (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ScenarioModel for ClaudeModel {
    fn name(&self) -> &str {
        "claude"
    }

    async fn generate(&self, prompt: &str) -> Result<String, FigspecError> {
        let payload = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: TEMPERATURE,
            top_p: TOP_P,
        };

        tracing::debug!(
            model = %payload.model,
            prompt_len = prompt.len(),
            "Sending request to Anthropic API"
        );

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status, message = %message, "Anthropic API error");
            return Err(FigspecError::Api {
                provider: "anthropic",
                status,
                message,
            });
        }

        let body: MessagesResponse = response.json().await?;
        Ok(body
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .unwrap_or_default())
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ── API types ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Mock provider that returns predefined responses without network calls
pub struct MockModel {
    /// Queue of responses to return (FIFO)
    responses: Arc<Mutex<Vec<String>>>,
    /// Default response when the queue is empty
    default_response: String,
    /// All prompts sent, for assertions
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_response: "Feature: mock".to_string(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create with a queue of responses
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::new()
        }
    }

    /// Set the default response used when the queue is empty
    pub fn with_default(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    /// Get the last prompt sent to this provider
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok()?.last().cloned()
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScenarioModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<String, FigspecError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let response = match self.responses.lock() {
            Ok(mut queue) if !queue.is_empty() => queue.remove(0),
            _ => self.default_response.clone(),
        };
        Ok(response)
    }
}
