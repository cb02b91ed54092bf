//! Retrieval-augmented answering over a vector index.

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, info};

use sibyl_core::error::Result;
use sibyl_vector::embedding::{DynEmbeddingService, EmbeddingService};
use sibyl_vector::index::VectorIndex;

use crate::llm::{DynLlmService, LlmService};
use crate::prompt::build_prompt;

/// Answer returned when the model produces no usable text.
pub const EMPTY_ANSWER_FALLBACK: &str = "No answer found.";

/// The answer produced for one question, with its supporting evidence.
#[derive(Debug, Clone)]
pub struct QaOutcome {
    /// Generated answer text.
    pub answer: String,
    /// Retrieved fragment texts, most similar first.
    pub fragments: Vec<String>,
    /// Wall-clock duration of retrieval plus generation.
    pub elapsed: Duration,
}

/// Question answering pipeline.
///
/// Embeds the question, retrieves the most similar fragments from the given
/// index, assembles the analyst prompt, and asks the language model.
pub struct QaPipeline {
    embedder: Box<dyn DynEmbeddingService>,
    llm: Box<dyn DynLlmService>,
    top_k: usize,
}

impl QaPipeline {
    /// Create a pipeline from concrete services.
    pub fn new(
        embedder: impl EmbeddingService + 'static,
        llm: impl LlmService + 'static,
        top_k: usize,
    ) -> Self {
        Self {
            embedder: Box::new(embedder),
            llm: Box::new(llm),
            top_k,
        }
    }

    /// Create a pipeline from boxed service objects.
    pub fn new_dyn(
        embedder: Box<dyn DynEmbeddingService>,
        llm: Box<dyn DynLlmService>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            llm,
            top_k,
        }
    }

    /// Answer a question against the given index.
    ///
    /// Fragments whose stored metadata carries no `text` field are skipped.
    pub async fn answer(&self, index: &VectorIndex, question: &str) -> Result<QaOutcome> {
        let started = Instant::now();

        let query = self.embedder.embed_boxed(question).await?;
        let hits = index.search(&query, self.top_k)?;

        let fragments: Vec<String> = hits
            .iter()
            .filter_map(|hit| hit.metadata.get("text").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        debug!(
            question_chars = question.chars().count(),
            retrieved = fragments.len(),
            "Context retrieved"
        );

        let prompt = build_prompt(&fragments, question);
        let raw_answer = self.llm.generate_boxed(&prompt).await?;

        let answer = if raw_answer.trim().is_empty() {
            EMPTY_ANSWER_FALLBACK.to_string()
        } else {
            raw_answer
        };

        let elapsed = started.elapsed();
        info!(
            retrieved = fragments.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Question answered"
        );

        Ok(QaOutcome {
            answer,
            fragments,
            elapsed,
        })
    }
}
