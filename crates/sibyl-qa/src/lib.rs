//! Sibyl QA crate: language model clients, prompt assembly, and the
//! retrieval-augmented answering pipeline.

pub mod groq;
pub mod llm;
pub mod orchestrator;
pub mod prompt;

pub use groq::GroqClient;
pub use llm::{DynLlmService, LlmService, MockLlm};
pub use orchestrator::{QaOutcome, QaPipeline, EMPTY_ANSWER_FALLBACK};
pub use prompt::{build_prompt, join_context};
