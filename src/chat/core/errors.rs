//! Error types for the chat subsystem.

use thiserror::Error;

/// Chat subsystem error type.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Room input rejected before it reached the store.
    #[error("invalid chat room: {0}")]
    InvalidRoom(String),
    /// Message input rejected before it reached the store.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
    /// Key-value backend failure (quota, poisoned lock, ...).
    #[error("storage error: {0}")]
    Storage(String),
    /// `SQLite` storage error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A stored timestamp could not be decoded.
    #[error("invalid timestamp: {0}")]
    Timestamp(String),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;
