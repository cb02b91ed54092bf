//! Google Generative AI embedding client.
//!
//! Calls the hosted `embedContent` endpoint. The base URL is injectable so
//! tests can point the client at a local mock server.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use sibyl_core::error::SibylError;

use crate::embedding::EmbeddingService;

/// Production API base for the Generative Language service.
pub const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Embedding provider backed by the Google Generative AI `embedContent` API.
///
/// The API key is sent as a query parameter, never validated up front; a
/// missing or wrong key surfaces as an error on the first request.
pub struct GoogleEmbedding {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    dimensions: usize,
}

impl GoogleEmbedding {
    /// Create a client against the production endpoint.
    pub fn new(
        api_key: String,
        model: String,
        dimensions: usize,
        timeout: Duration,
    ) -> Result<Self, SibylError> {
        Self::with_base_url(GOOGLE_API_BASE, api_key, model, dimensions, timeout)
    }

    /// Create a client against a specific API base URL.
    pub fn with_base_url(
        base_url: &str,
        api_key: String,
        model: String,
        dimensions: usize,
        timeout: Duration,
    ) -> Result<Self, SibylError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SibylError::Embedding(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
            dimensions,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:embedContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

impl std::fmt::Debug for GoogleEmbedding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleEmbedding")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl EmbeddingService for GoogleEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SibylError> {
        if text.is_empty() {
            return Err(SibylError::Embedding("Cannot embed empty text".to_string()));
        }

        let request = EmbedContentRequest {
            model: format!("models/{}", self.model),
            content: EmbedContentPayload {
                parts: vec![EmbedContentPart {
                    text: text.to_string(),
                }],
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SibylError::Embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SibylError::Embedding(format!(
                "Embedding API returned {}: {}",
                status, body
            )));
        }

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| SibylError::Embedding(format!("Invalid embedding API response: {}", e)))?;

        debug!(
            chars = text.chars().count(),
            dims = parsed.embedding.values.len(),
            "Embedded text"
        );

        Ok(parsed.embedding.values)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    model: String,
    content: EmbedContentPayload,
}

#[derive(Debug, Serialize)]
struct EmbedContentPayload {
    parts: Vec<EmbedContentPart>,
}

#[derive(Debug, Serialize)]
struct EmbedContentPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbedContentValues,
}

#[derive(Debug, Deserialize)]
struct EmbedContentValues {
    values: Vec<f32>,
}
