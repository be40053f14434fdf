//! LexDesk error type.

use thiserror::Error;

/// Errors shared across LexDesk crates.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The data provider failed to answer a listing request.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),

    #[error("Not found: {entity} '{id}'")]
    NotFound { entity: &'static str, id: String },
}

pub type Result<T> = std::result::Result<T, LexError>;
