//! Language model service trait and the deterministic mock implementation.

use sibyl_core::error::SibylError;

/// Service for generating answer text from an assembled prompt.
pub trait LlmService: Send + Sync {
    /// Generate a completion for the given prompt.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, SibylError>> + Send;
}

/// Object-safe variant of [`LlmService`] for use behind `Box<dyn _>`.
pub trait DynLlmService: Send + Sync {
    /// Generate a completion, boxed for dynamic dispatch.
    fn generate_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, SibylError>> + Send + 'a>>;
}

impl<T: LlmService> DynLlmService for T {
    fn generate_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, SibylError>> + Send + 'a>>
    {
        Box::pin(self.generate(prompt))
    }
}

// ---------------------------------------------------------------------------

/// Mock language model for tests and offline development.
///
/// By default the mock echoes the assembled prompt back as the answer, so
/// callers can assert on what actually reached the model. A fixed reply can
/// be configured instead, including an empty one to exercise fallbacks.
#[derive(Debug, Clone, Default)]
pub struct MockLlm {
    reply: Option<String>,
}

impl MockLlm {
    /// Mock that echoes the prompt back as the answer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that always returns the given reply.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }
}

impl LlmService for MockLlm {
    async fn generate(&self, prompt: &str) -> Result<String, SibylError> {
        if prompt.is_empty() {
            return Err(SibylError::Generation(
                "Cannot generate from an empty prompt".to_string(),
            ));
        }
        Ok(match &self.reply {
            Some(reply) => reply.clone(),
            None => prompt.to_string(),
        })
    }
}
