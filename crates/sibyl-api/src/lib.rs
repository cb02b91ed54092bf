//! Sibyl API crate - axum HTTP server and route handlers.
//!
//! Provides the REST API for the Sibyl service: corpus embedding,
//! question answering, and health checks.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
