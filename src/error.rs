//! Error types for vidlib.

use thiserror::Error;

/// Library-level error type for vidlib operations.
#[derive(Error, Debug)]
pub enum VidlibError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("top_k must be between 1 and {max}, got {got}")]
    InvalidTopK { got: i64, max: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Malformed range: {0}")]
    MalformedRange(String),

    #[error("Provider quota exceeded: {0}")]
    RateLimited(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(#[source] Box<VidlibError>),

    #[error("Vector search failed: {0}")]
    SearchFailed(String),

    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Answer synthesis failed: {0}")]
    Synthesis(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Coarse classification used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    RangeNotSatisfiable,
    Unavailable,
    Internal,
}

impl VidlibError {
    /// Classify this error. Wrapped embedding failures take the kind of their cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VidlibError::InvalidIdentifier(_)
            | VidlibError::EmptyQuery
            | VidlibError::InvalidTopK { .. }
            | VidlibError::InvalidInput(_) => ErrorKind::InvalidInput,
            VidlibError::AssetNotFound(_) => ErrorKind::NotFound,
            VidlibError::MalformedRange(_) => ErrorKind::RangeNotSatisfiable,
            VidlibError::RateLimited(_) | VidlibError::IndexUnavailable(_) => {
                ErrorKind::Unavailable
            }
            VidlibError::EmbeddingFailed(cause) => match cause.kind() {
                ErrorKind::Unavailable => ErrorKind::Unavailable,
                _ => ErrorKind::Internal,
            },
            _ => ErrorKind::Internal,
        }
    }
}

/// Result type alias for vidlib operations.
pub type Result<T> = std::result::Result<T, VidlibError>;
