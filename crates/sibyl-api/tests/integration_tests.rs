//! Integration tests for the Sibyl API.
//!
//! Each test drives the full router with its own in-memory state: mock
//! embedding, a prompt-echoing mock model, and a temporary corpus file.

use std::io::Write;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::NamedTempFile;
use tower::ServiceExt;

use sibyl_api::create_router;
use sibyl_api::handlers::{AskResponse, EmbedResponse, HealthResponse};
use sibyl_api::state::AppState;
use sibyl_core::config::SibylConfig;
use sibyl_qa::{MockLlm, QaPipeline};
use sibyl_vector::{IndexingPipeline, MockEmbedding, TextChunker};

// =============================================================================
// Helpers
// =============================================================================

const PEOPLE_CORPUS: &str = r#"[{"name": "Alice", "age": "30"}, {"name": "Bob", "age": "25"}]"#;

/// Create a fresh AppState with mock embedding and a prompt-echoing model.
fn make_state() -> AppState {
    let config = SibylConfig::default();
    let pipeline = IndexingPipeline::new(MockEmbedding::new(), TextChunker::default());
    let qa = QaPipeline::new(MockEmbedding::new(), MockLlm::new(), config.retrieval.top_k);
    AppState::new(config, pipeline, qa)
}

/// Create a fresh router from a new state.
fn make_app() -> axum::Router {
    create_router(make_state())
}

/// Write corpus content to a temporary file and return its handle.
fn write_corpus(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Build a POST request with a JSON body.
fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

/// Read full response body bytes.
async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

/// POST /embed for the given corpus file path.
async fn embed_file(app: &axum::Router, path: &str) -> axum::response::Response {
    let body = serde_json::json!({ "file_path": path }).to_string();
    app.clone().oneshot(post_json("/embed", &body)).await.unwrap()
}

// =============================================================================
// /health
// =============================================================================

#[tokio::test]
async fn test_health_before_embed() {
    let app = make_app();
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.status, "ok");
    assert!(!health.index_ready);
    assert_eq!(health.record_count, 0);
    assert_eq!(health.fragment_count, 0);
}

#[tokio::test]
async fn test_health_after_embed() {
    let app = make_app();
    let corpus = write_corpus(PEOPLE_CORPUS);
    let resp = embed_file(&app, corpus.path().to_str().unwrap()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(health.index_ready);
    assert_eq!(health.record_count, 2);
    assert_eq!(health.fragment_count, 2);
}

// =============================================================================
// /embed
// =============================================================================

#[tokio::test]
async fn test_embed_happy_path() {
    let app = make_app();
    let corpus = write_corpus(PEOPLE_CORPUS);

    let resp = embed_file(&app, corpus.path().to_str().unwrap()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: EmbedResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body.status, "success");
    assert_eq!(body.message, "Vector store DB is ready.");
}

#[tokio::test]
async fn test_embed_missing_file_path_field() {
    let app = make_app();
    let resp = app.oneshot(post_json("/embed", "{}")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Invalid or missing file path.");
}

#[tokio::test]
async fn test_embed_null_file_path() {
    let app = make_app();
    let resp = app
        .oneshot(post_json("/embed", r#"{"file_path": null}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["message"], "Invalid or missing file path.");
}

#[tokio::test]
async fn test_embed_empty_file_path() {
    let app = make_app();
    let resp = app
        .oneshot(post_json("/embed", r#"{"file_path": ""}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["message"], "Invalid or missing file path.");
}

#[tokio::test]
async fn test_embed_nonexistent_file() {
    let app = make_app();
    let resp = embed_file(&app, "/nonexistent/definitely-not-here.json").await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["message"], "Invalid or missing file path.");
}

#[tokio::test]
async fn test_embed_rejects_malformed_json_file() {
    let app = make_app();
    let corpus = write_corpus("this is not json");

    let resp = embed_file(&app, corpus.path().to_str().unwrap()).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Invalid JSON file format.");
}

#[tokio::test]
async fn test_embed_rejects_top_level_object() {
    let app = make_app();
    let corpus = write_corpus(r#"{"name": "Alice", "age": "30"}"#);

    let resp = embed_file(&app, corpus.path().to_str().unwrap()).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["message"], "JSON data must be a list of records.");
}

#[tokio::test]
async fn test_embed_rejects_non_object_elements() {
    let app = make_app();
    let corpus = write_corpus("[1, 2, 3]");

    let resp = embed_file(&app, corpus.path().to_str().unwrap()).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["message"], "JSON data must be a list of records.");
}

#[tokio::test]
async fn test_embed_empty_list_is_valid() {
    let app = make_app();
    let corpus = write_corpus("[]");

    let resp = embed_file(&app, corpus.path().to_str().unwrap()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: EmbedResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body.message, "Vector store DB is ready.");

    // An empty corpus still counts as embedded.
    let resp = app
        .oneshot(post_json("/ask", r#"{"question": "Anything there?"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let ask: AskResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(ask.similar_documents.is_empty());
}

// =============================================================================
// /ask
// =============================================================================

#[tokio::test]
async fn test_ask_before_embed() {
    let app = make_app();
    let resp = app
        .oneshot(post_json("/ask", r#"{"question": "How old is Alice?"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Documents not embedded yet. Run /embed first.");
}

#[tokio::test]
async fn test_ask_missing_question_before_embed() {
    // Readiness is reported before the question is validated.
    let app = make_app();
    let resp = app.oneshot(post_json("/ask", "{}")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["message"], "Documents not embedded yet. Run /embed first.");
}

#[tokio::test]
async fn test_embed_then_ask() {
    let app = make_app();
    let corpus = write_corpus(PEOPLE_CORPUS);
    embed_file(&app, corpus.path().to_str().unwrap()).await;

    let resp = app
        .oneshot(post_json("/ask", r#"{"question": "How old is Alice?"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: AskResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body.status, "success");
    // The echo model returns the assembled prompt, so the retrieved
    // context and the question must both have reached the model.
    assert!(body.answer.contains("name: Alice | age: 30"));
    assert!(body.answer.contains("Question: How old is Alice?"));
    assert_eq!(body.similar_documents.len(), 2);
    assert!(body
        .similar_documents
        .iter()
        .any(|d| d == "name: Alice | age: 30"));
    assert!(body.response_time.ends_with(" seconds"));
}

#[tokio::test]
async fn test_ask_response_time_format() {
    let app = make_app();
    let corpus = write_corpus(PEOPLE_CORPUS);
    embed_file(&app, corpus.path().to_str().unwrap()).await;

    let resp = app
        .oneshot(post_json("/ask", r#"{"question": "How old is Bob?"}"#))
        .await
        .unwrap();

    let body: AskResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    let secs = body.response_time.strip_suffix(" seconds").unwrap();
    assert!(secs.parse::<f64>().is_ok(), "bad duration: {}", secs);
    assert_eq!(secs.split('.').nth(1).unwrap().len(), 2);
}

#[tokio::test]
async fn test_ask_empty_question_after_embed() {
    let app = make_app();
    let corpus = write_corpus(PEOPLE_CORPUS);
    embed_file(&app, corpus.path().to_str().unwrap()).await;

    let resp = app
        .oneshot(post_json("/ask", r#"{"question": ""}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["message"], "No question provided.");
}

#[tokio::test]
async fn test_ask_whitespace_question_after_embed() {
    let app = make_app();
    let corpus = write_corpus(PEOPLE_CORPUS);
    embed_file(&app, corpus.path().to_str().unwrap()).await;

    let resp = app
        .oneshot(post_json("/ask", r#"{"question": "   "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["message"], "No question provided.");
}

#[tokio::test]
async fn test_ask_missing_question_after_embed() {
    let app = make_app();
    let corpus = write_corpus(PEOPLE_CORPUS);
    embed_file(&app, corpus.path().to_str().unwrap()).await;

    let resp = app.oneshot(post_json("/ask", "{}")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["message"], "No question provided.");
}

// =============================================================================
// Malformed request bodies
// =============================================================================

#[tokio::test]
async fn test_embed_rejects_unparseable_body() {
    let app = make_app();
    let resp = app.oneshot(post_json("/embed", "{invalid")).await.unwrap();

    // Body extraction failures use the same envelope as handler validation.
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body:"));
}

#[tokio::test]
async fn test_embed_rejects_null_body() {
    let app = make_app();
    let resp = app.oneshot(post_json("/embed", "null")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body:"));
}

#[tokio::test]
async fn test_ask_rejects_missing_content_type() {
    let app = make_app();
    let req = Request::post("/ask")
        .body(Body::from(r#"{"question": "How old is Alice?"}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body:"));
}

// =============================================================================
// Snapshot replacement
// =============================================================================

#[tokio::test]
async fn test_failed_reembed_preserves_previous_index() {
    let app = make_app();
    let good = write_corpus(PEOPLE_CORPUS);
    let bad = write_corpus(r#"{"not": "a list"}"#);

    let resp = embed_file(&app, good.path().to_str().unwrap()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = embed_file(&app, bad.path().to_str().unwrap()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The first corpus still serves /ask.
    let resp = app
        .oneshot(post_json("/ask", r#"{"question": "How old is Alice?"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: AskResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(body
        .similar_documents
        .iter()
        .any(|d| d == "name: Alice | age: 30"));
}

#[tokio::test]
async fn test_reembed_replaces_index() {
    let app = make_app();
    let people = write_corpus(PEOPLE_CORPUS);
    let cities = write_corpus(r#"[{"city": "Paris", "country": "France"}]"#);

    embed_file(&app, people.path().to_str().unwrap()).await;
    let resp = embed_file(&app, cities.path().to_str().unwrap()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(post_json("/ask", r#"{"question": "Which city?"}"#))
        .await
        .unwrap();

    let body: AskResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body.similar_documents, vec!["city: Paris | country: France"]);
}
