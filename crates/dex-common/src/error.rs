//! Error types shared across the harvester crates

use thiserror::Error;

/// Result type alias for shared operations
pub type Result<T> = std::result::Result<T, DexError>;

/// Main error type for shared operations
#[derive(Error, Debug)]
pub enum DexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),
}
