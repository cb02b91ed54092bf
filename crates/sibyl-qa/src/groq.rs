//! Groq chat completions client.
//!
//! Speaks the OpenAI-compatible chat API. The base URL is injectable so
//! tests can point the client at a local mock server.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use sibyl_core::error::SibylError;

use crate::llm::LlmService;

/// Production base URL for Groq's OpenAI-compatible API.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Language model service backed by the Groq chat completions API.
pub struct GroqClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl GroqClient {
    /// Create a client against the production Groq API.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        timeout: Duration,
    ) -> Result<Self, SibylError> {
        Self::with_base_url(GROQ_API_BASE, api_key, model, temperature, max_tokens, timeout)
    }

    /// Create a client against an arbitrary base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        timeout: Duration,
    ) -> Result<Self, SibylError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SibylError::Generation(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            temperature,
            max_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl LlmService for GroqClient {
    async fn generate(&self, prompt: &str) -> Result<String, SibylError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SibylError::Generation(format!("Chat request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SibylError::Generation(format!(
                "Chat API returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| SibylError::Generation(format!("Invalid chat API response: {}", e)))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SibylError::Generation("Chat API returned no choices".to_string()))?;

        debug!(
            model = %self.model,
            finish_reason = choice.finish_reason.as_deref().unwrap_or("stop"),
            "Completion received"
        );

        Ok(choice.message.content)
    }
}

// ---------------------------------------------------------------------------
// Wire format

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
