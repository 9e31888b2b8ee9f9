//! Common error types for the song catalog

use thiserror::Error;

use crate::song_id::InvalidSongId;

/// Common result type for song catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the catalog crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored or loaded JSON could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed song identifier
    #[error(transparent)]
    InvalidId(#[from] InvalidSongId),
}
