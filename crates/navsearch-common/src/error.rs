//! Error types for Navy Search

use thiserror::Error;

/// Result type alias for Navy Search operations
pub type Result<T> = std::result::Result<T, NavSearchError>;

/// Main error type for Navy Search
#[derive(Error, Debug)]
pub enum NavSearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}
