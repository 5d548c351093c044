//! Storage error types.
//!
//! Every error variant carries the document name (or path) it concerns so
//! failures can be diagnosed from the log line alone.

/// Errors that can occur during document storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to open or create the store directory.
    #[error("failed to open document store at '{path}': {reason}")]
    Open { path: String, reason: String },

    /// Failed to read a document.
    #[error("failed to read document '{name}': {reason}")]
    Read { name: String, reason: String },

    /// Failed to write a document.
    #[error("failed to write document '{name}': {reason}")]
    Write { name: String, reason: String },

    /// Failed to delete a document.
    #[error("failed to delete document '{name}': {reason}")]
    Delete { name: String, reason: String },

    /// Failed to list the store directory.
    #[error("failed to list documents in '{path}': {reason}")]
    List { path: String, reason: String },
}
