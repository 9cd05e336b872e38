//! Error types for vocabr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in vocabr
#[derive(Debug, Error)]
pub enum VocabrError {
    /// No review record exists for the (user, word) pair
    #[error("Word {word_id} is not enrolled for user {user_id}")]
    NotEnrolled { user_id: i64, word_id: i64 },

    /// The word id is not present in the catalog
    #[error("Unknown word: {0}")]
    UnknownWord(i64),

    /// Any failure of the persistence round-trip
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Malformed caller input (catalog entries, limits, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<rusqlite::Error> for VocabrError {
    fn from(err: rusqlite::Error) -> Self {
        VocabrError::StorageUnavailable(err.to_string())
    }
}

/// Result type alias for vocabr operations
pub type Result<T> = std::result::Result<T, VocabrError>;
