//! Route handler functions for the embed, ask, and health endpoints.
//!
//! Each handler extracts the JSON request body via axum extractors,
//! drives the pipelines in AppState, and returns JSON responses.

use std::path::Path;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use sibyl_vector::pipeline::IndexSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct EmbedRequest {
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: Option<String>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub status: String,
    pub answer: String,
    pub response_time: String,
    pub similar_documents: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub index_ready: bool,
    pub record_count: usize,
    pub fragment_count: usize,
}

// =============================================================================
// Handler functions
// =============================================================================

/// POST /embed - read a JSON corpus file, build a fresh index, swap it in.
pub async fn embed(
    State(state): State<AppState>,
    body: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let Json(req) = body?;
    let file_path = req.file_path.unwrap_or_default();
    if file_path.is_empty() || !Path::new(&file_path).exists() {
        return Err(ApiError::BadRequest(
            "Invalid or missing file path.".to_string(),
        ));
    }

    let content = tokio::fs::read_to_string(&file_path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read {}: {}", file_path, e)))?;

    let snapshot = state.pipeline.build(&file_path, &content).await?;

    // The new snapshot replaces the old one only after a fully successful
    // build; a failed rebuild leaves the previous index serving /ask.
    let mut slot = state
        .snapshot
        .write()
        .map_err(|e| ApiError::Internal(format!("Lock poisoned: {}", e)))?;
    *slot = Some(Arc::new(snapshot));

    Ok(Json(EmbedResponse {
        status: "success".to_string(),
        message: "Vector store DB is ready.".to_string(),
    }))
}

/// POST /ask - answer a question against the indexed corpus.
pub async fn ask(
    State(state): State<AppState>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(req) = body?;

    // Readiness is checked before the question itself.
    let snapshot = current_snapshot(&state)?.ok_or_else(|| {
        ApiError::BadRequest("Documents not embedded yet. Run /embed first.".to_string())
    })?;

    let question = req.question.unwrap_or_default();
    if question.trim().is_empty() {
        return Err(ApiError::BadRequest("No question provided.".to_string()));
    }

    let outcome = state.qa.answer(&snapshot.index, &question).await?;

    Ok(Json(AskResponse {
        status: "success".to_string(),
        answer: outcome.answer,
        response_time: format!("{:.2} seconds", outcome.elapsed.as_secs_f64()),
        similar_documents: outcome.fragments,
    }))
}

/// GET /health - liveness plus index readiness counters.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let uptime = state.start_time.elapsed().as_secs();
    let snapshot = current_snapshot(&state)?;

    let (index_ready, record_count, fragment_count) = match &snapshot {
        Some(snap) => (true, snap.record_count, snap.fragment_count),
        None => (false, 0, 0),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime,
        index_ready,
        record_count,
        fragment_count,
    }))
}

/// Clone the currently served snapshot out of the slot.
fn current_snapshot(state: &AppState) -> Result<Option<Arc<IndexSnapshot>>, ApiError> {
    let slot = state
        .snapshot
        .read()
        .map_err(|e| ApiError::Internal(format!("Lock poisoned: {}", e)))?;
    Ok(slot.clone())
}
