//! Corpus indexing pipeline.
//!
//! Builds a fresh vector index from a JSON record corpus: parse and flatten
//! the records, split each flattened line into overlapping fragments, embed
//! every fragment, and load the vectors into a new index. The previous index
//! (if any) is never touched; callers swap the returned snapshot in only
//! after the whole build has succeeded.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use sibyl_core::error::Result;

use crate::chunker::TextChunker;
use crate::embedding::{DynEmbeddingService, EmbeddingService};
use crate::flatten::flatten_corpus;
use crate::index::VectorIndex;

/// The result of one successful indexing run.
///
/// Immutable once produced. Fragment metadata inside the index carries the
/// fragment text plus a back-reference to its source record.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    /// The populated index.
    pub index: Arc<VectorIndex>,
    /// Path of the source corpus file.
    pub source: String,
    /// Number of records in the corpus.
    pub record_count: usize,
    /// Number of fragments embedded and stored.
    pub fragment_count: usize,
    /// When the build completed.
    pub built_at: DateTime<Utc>,
}

/// Builds queryable snapshots from record corpora.
///
/// Stages: flatten -> chunk -> embed -> index. Any stage failure aborts the
/// build and the partially built index is dropped.
pub struct IndexingPipeline {
    embedder: Box<dyn DynEmbeddingService>,
    chunker: TextChunker,
}

impl IndexingPipeline {
    /// Create a pipeline from an embedder and a chunker.
    pub fn new(embedder: impl EmbeddingService + 'static, chunker: TextChunker) -> Self {
        Self {
            embedder: Box::new(embedder),
            chunker,
        }
    }

    /// Create a pipeline from a boxed embedder object.
    pub fn new_dyn(embedder: Box<dyn DynEmbeddingService>, chunker: TextChunker) -> Self {
        Self { embedder, chunker }
    }

    /// Build a fresh snapshot from raw corpus content.
    ///
    /// `source` labels the snapshot for diagnostics; validation of the
    /// content (JSON shape, list-of-objects) happens here.
    pub async fn build(&self, source: &str, content: &str) -> Result<IndexSnapshot> {
        let started = Instant::now();

        let flat_records = flatten_corpus(content)?;
        let record_count = flat_records.len();

        let index = VectorIndex::new();
        let mut fragment_count = 0;

        for flat in &flat_records {
            for chunk in self.chunker.split(&flat.text) {
                let embedding = self.embedder.embed_boxed(&chunk.text).await?;
                index.insert(
                    Uuid::new_v4(),
                    embedding,
                    json!({
                        "text": chunk.text,
                        "record_index": flat.record_index,
                        "chunk_index": chunk.index,
                    }),
                )?;
                fragment_count += 1;
            }
        }

        info!(
            source = %source,
            records = record_count,
            fragments = fragment_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Corpus indexed"
        );

        Ok(IndexSnapshot {
            index: Arc::new(index),
            source: source.to_string(),
            record_count,
            fragment_count,
            built_at: Utc::now(),
        })
    }
}
