//! Error types for todoline.

use thiserror::Error;

/// Errors produced by the todoline library.
///
/// Parsing a command never fails; these cover configuration, storage and
/// terminal problems around it.
#[derive(Debug, Error)]
pub enum TodoError {
    /// Configuration or path resolution failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A `SQLite` operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Filesystem I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested task does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The user supplied input that cannot be acted on.
    #[error("{0}")]
    InvalidInput(String),

    /// The interactive terminal could not be driven.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl TodoError {
    /// Wrap a `rusqlite` error with a short description of what was attempted.
    pub(crate) fn database(context: &str, err: &rusqlite::Error) -> Self {
        Self::Database(format!("{context}: {err}"))
    }
}
