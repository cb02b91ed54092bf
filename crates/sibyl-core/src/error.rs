use thiserror::Error;

/// Top-level error type for the Sibyl system.
///
/// `Validation` and `NotReady` describe problems with the caller's request
/// and map to HTTP 400 at the API boundary; every other variant is an
/// operational failure and maps to HTTP 500.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SibylError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not ready: {0}")]
    NotReady(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for SibylError {
    fn from(err: toml::de::Error) -> Self {
        SibylError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SibylError {
    fn from(err: toml::ser::Error) -> Self {
        SibylError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SibylError {
    fn from(err: serde_json::Error) -> Self {
        SibylError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Sibyl operations.
pub type Result<T> = std::result::Result<T, SibylError>;
