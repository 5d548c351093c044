//! Document backend abstraction for Quire.
//!
//! This crate defines the [`DocumentBackend`] trait — a flat namespace of
//! named documents with no nesting and no metadata. The document store in
//! `quire-core` wraps a backend to enforce filename validity and the
//! duplicate operation; this layer only moves bytes.
//!
//! Two implementations are provided:
//!
//! - [`FsBackend`] — production default, one file per document in a single
//!   directory
//! - [`MemoryBackend`] — in-memory, for testing only

mod error;
mod fs;
mod memory;

pub use error::StorageError;
pub use fs::FsBackend;
pub use memory::MemoryBackend;

/// A flat store of named documents.
///
/// Names are opaque UTF-8 strings without any path structure — validation
/// of what constitutes an acceptable document name happens above this
/// layer. Contents are opaque byte arrays.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait DocumentBackend: Send + Sync + 'static {
    /// List the names of all stored documents, in backend order.
    ///
    /// No particular ordering is guaranteed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::List`] if the underlying backend fails.
    async fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Retrieve a document's contents by name.
    ///
    /// Returns `Ok(None)` if the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the underlying backend fails.
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store a document, creating it if absent and fully overwriting it
    /// if present.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the underlying backend fails.
    async fn write(&self, name: &str, content: &[u8]) -> Result<(), StorageError>;

    /// Delete a document. Returns `false` if it did not exist — mapping
    /// absence to an error is the store's job, not the backend's.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Delete`] if the underlying backend fails.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;

    /// Check whether a document exists.
    ///
    /// The default implementation calls [`read`](DocumentBackend::read) and
    /// checks for `Some`. Backends may override this with a cheaper check.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the underlying backend fails.
    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.read(name).await?.is_some())
    }
}
