//! Sibyl vector crate - record flattening, text chunking, embedding
//! providers, the in-memory vector index, and the corpus indexing pipeline.
//!
//! Provides everything between "a JSON file of records" and "a queryable
//! snapshot": parsing and flattening, deterministic overlapping splitting,
//! an embedding service trait with hosted and mock implementations, and
//! brute-force cosine similarity search.

pub mod chunker;
pub mod embedding;
pub mod flatten;
pub mod google;
pub mod index;
pub mod pipeline;

pub use chunker::{Chunk, TextChunker};
pub use embedding::{DynEmbeddingService, EmbeddingService, MockEmbedding};
pub use flatten::{flatten_corpus, flatten_record, parse_records, FlatRecord};
pub use google::GoogleEmbedding;
pub use index::{SearchHit, VectorIndex};
pub use pipeline::{IndexSnapshot, IndexingPipeline};
