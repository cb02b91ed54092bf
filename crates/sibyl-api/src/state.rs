//! Application state shared across all route handlers.
//!
//! AppState holds the configuration, the two pipelines, and the slot for
//! the currently served index snapshot. It is passed to handlers via
//! axum's State extractor.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use sibyl_core::config::SibylConfig;
use sibyl_qa::QaPipeline;
use sibyl_vector::pipeline::{IndexSnapshot, IndexingPipeline};

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. The
/// snapshot slot starts empty and is replaced atomically by `/embed`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<SibylConfig>,
    /// Corpus indexing pipeline (flatten + chunk + embed + index).
    pub pipeline: Arc<IndexingPipeline>,
    /// Question answering pipeline (embed + retrieve + prompt + generate).
    pub qa: Arc<QaPipeline>,
    /// The snapshot currently served by `/ask`, if any.
    pub snapshot: Arc<RwLock<Option<Arc<IndexSnapshot>>>>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState with the given components.
    pub fn new(config: SibylConfig, pipeline: IndexingPipeline, qa: QaPipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            qa: Arc::new(qa),
            snapshot: Arc::new(RwLock::new(None)),
            start_time: Instant::now(),
        }
    }
}
