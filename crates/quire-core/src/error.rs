//! Error types for `quire-core`.
//!
//! Each error variant carries enough context to diagnose the problem from
//! a log line. Credential errors never include password material — only
//! usernames and operation descriptions.

use quire_storage::StorageError;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The document does not exist in the store.
    #[error("document not found: {name}")]
    NotFound { name: String },

    /// The filename failed validation (empty, bad extension, or path
    /// separator parts).
    #[error("invalid document name: '{name}'")]
    InvalidName { name: String },

    /// The underlying storage backend returned an error.
    #[error("document storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from content rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The document's extension has no recognized rendering.
    #[error("no recognized rendering for '{name}'")]
    UnsupportedType { name: String },
}

/// Errors from credential store operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The credentials file could not be read or written.
    #[error("credentials file I/O failed at '{path}': {reason}")]
    Io { path: String, reason: String },

    /// The credentials file exists but does not parse.
    #[error("credentials file at '{path}' is malformed: {reason}")]
    Parse { path: String, reason: String },

    /// Password hashing failed.
    #[error("password hashing failed: {reason}")]
    Hash { reason: String },
}

/// Errors from the auth gate.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Username/password pair did not verify.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A signed-in session is required for this operation.
    #[error("you must be signed in to do that")]
    Required,

    /// The credential store failed underneath a sign-in or registration.
    #[error("auth credential error: {0}")]
    Credential(#[from] CredentialError),
}
