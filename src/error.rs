//! Error types for csmt

use thiserror::Error;

/// Result type alias for csmt operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in csmt operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid batch: {0}")]
    Validation(String),

    #[error("Key \"{0}\" already exists")]
    DuplicateKey(String),

    #[error("Key \"{0}\" does not exist")]
    NotFound(String),

    #[error("Key \"{key}\" routes along the same path as existing key \"{existing}\"")]
    PathCollision { key: String, existing: String },

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("Config error: {0}")]
    Config(String),
}
