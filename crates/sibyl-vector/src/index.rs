//! In-memory vector index with brute-force cosine similarity search.
//!
//! A fresh index is built per corpus and swapped in atomically, so a
//! single index instance is only ever written during its build and is
//! immutable once it becomes visible to queries. Search is O(n), which
//! is acceptable for moderate corpus sizes.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use uuid::Uuid;

use sibyl_core::error::SibylError;

/// A single hit returned from a vector search.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The ID of the matching fragment entry.
    pub id: Uuid,
    /// Cosine similarity score.
    pub score: f64,
    /// Fragment metadata: text, record index, and chunk index.
    pub metadata: Value,
}

/// An entry stored in the vector index.
#[derive(Debug, Clone)]
struct VectorEntry {
    embedding: Vec<f32>,
    metadata: Value,
}

/// In-memory vector index using brute-force cosine similarity.
///
/// Thread-safe via interior RwLock.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    entries: Arc<RwLock<HashMap<Uuid, VectorEntry>>>,
}

impl VectorIndex {
    /// Create a new empty vector index.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a vector with associated metadata into the index.
    ///
    /// Overwrites any existing entry with the same ID.
    pub fn insert(&self, id: Uuid, embedding: Vec<f32>, metadata: Value) -> Result<(), SibylError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| SibylError::Index(format!("Lock poisoned: {}", e)))?;
        entries.insert(id, VectorEntry { embedding, metadata });
        Ok(())
    }

    /// Search for the k nearest neighbors to the query vector by cosine similarity.
    ///
    /// Returns results sorted by descending similarity score.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, SibylError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| SibylError::Index(format!("Lock poisoned: {}", e)))?;

        let mut scored: Vec<SearchHit> = entries
            .iter()
            .map(|(id, entry)| {
                let score = cosine_similarity(query, &entry.embedding);
                SearchHit {
                    id: *id,
                    score,
                    metadata: entry.metadata.clone(),
                }
            })
            .collect();

        // Sort by descending score.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }

    /// Return the number of vectors currently stored in the index.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Return true if the index contains no vectors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude or the lengths differ.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();

    let mag_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}
