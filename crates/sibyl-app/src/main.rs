//! Sibyl application binary - composition root.
//!
//! Ties together the Sibyl crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Select the embedding and language model providers
//! 3. Build the indexing and QA pipelines
//! 4. Start the axum REST API server

use std::time::Duration;

use clap::Parser;

use sibyl_core::config::SibylConfig;
use sibyl_core::error::SibylError;

use sibyl_api::routes;
use sibyl_api::state::AppState;
use sibyl_qa::llm::DynLlmService;
use sibyl_qa::{GroqClient, MockLlm, QaPipeline};
use sibyl_vector::embedding::DynEmbeddingService;
use sibyl_vector::{GoogleEmbedding, IndexingPipeline, MockEmbedding, TextChunker};

mod cli;

use cli::CliArgs;

/// Read the API key named by the config, warning when it is absent.
///
/// A missing key does not abort startup; requests to the provider fail
/// at call time instead.
fn read_api_key(env_var: &str, provider: &str) -> String {
    match std::env::var(env_var) {
        Ok(key) if !key.is_empty() => key,
        _ => {
            tracing::warn!(env_var, provider, "API key not set");
            String::new()
        }
    }
}

/// Build the embedding service named by the config.
fn make_embedder(config: &SibylConfig) -> Result<Box<dyn DynEmbeddingService>, SibylError> {
    match config.embedding.provider.as_str() {
        "google" => {
            let api_key = read_api_key(&config.embedding.api_key_env, "google");
            let embedder = GoogleEmbedding::with_base_url(
                &config.embedding.base_url,
                api_key,
                config.embedding.model.clone(),
                config.embedding.dimensions,
                Duration::from_secs(config.embedding.timeout_secs),
            )?;
            Ok(Box::new(embedder))
        }
        "mock" => Ok(Box::new(MockEmbedding::new())),
        other => Err(SibylError::Config(format!(
            "Unknown embedding provider '{}'",
            other
        ))),
    }
}

/// Build the language model service named by the config.
fn make_llm(config: &SibylConfig) -> Result<Box<dyn DynLlmService>, SibylError> {
    match config.llm.provider.as_str() {
        "groq" => {
            let api_key = read_api_key(&config.llm.api_key_env, "groq");
            let client = GroqClient::with_base_url(
                config.llm.base_url.clone(),
                api_key,
                config.llm.model.clone(),
                config.llm.temperature,
                config.llm.max_tokens,
                Duration::from_secs(config.llm.timeout_secs),
            )?;
            Ok(Box::new(client))
        }
        "mock" => Ok(Box::new(MockLlm::new())),
        other => Err(SibylError::Config(format!(
            "Unknown LLM provider '{}'",
            other
        ))),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = SibylConfig::load_or_default(&config_file);
    config.server.port = args.resolve_port(config.server.port);
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    // Tracing. RUST_LOG overrides the resolved level.
    let log_level = args
        .resolve_log_level()
        .unwrap_or_else(|| config.general.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting Sibyl v{}", env!("CARGO_PKG_VERSION"));
    if config_file.exists() {
        tracing::info!(path = %config_file.display(), "Configuration loaded");
    } else {
        tracing::warn!(path = %config_file.display(), "Config file not found, using defaults");
    }

    // Providers. The indexing and QA pipelines each get their own
    // embedder instance with its own HTTP client.
    let embedder = make_embedder(&config)?;
    let qa_embedder = make_embedder(&config)?;
    let llm = make_llm(&config)?;
    tracing::info!(
        embedding = %config.embedding.provider,
        llm = %config.llm.provider,
        model = %config.llm.model,
        "Providers initialized"
    );

    // Pipelines.
    let chunker = TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap);
    let pipeline = IndexingPipeline::new_dyn(embedder, chunker);
    let qa = QaPipeline::new_dyn(qa_embedder, llm, config.retrieval.top_k);

    let state = AppState::new(config, pipeline, qa);

    // API server. Blocks until shutdown.
    routes::start_server(state).await?;

    Ok(())
}
