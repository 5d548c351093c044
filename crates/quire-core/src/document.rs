//! Document store for Quire.
//!
//! Wraps a [`DocumentBackend`] the way every byte of document content must
//! travel: names are checked before they reach the backend, absence is
//! mapped to [`DocumentError::NotFound`], and duplication composes a
//! `copy_of_` name. The backend itself never sees an unguarded name.
//!
//! # Name rules
//!
//! - Creation requires a non-empty name ending in a recognized extension
//!   (`.txt` or `.md`).
//! - Every operation rejects names carrying path separators or dot
//!   components — only flat base names ever reach the backend.
//! - Documents pre-seeded on disk with unrecognized extensions are still
//!   listable and readable; only *creating* such a name is refused.

use std::sync::Arc;

use tracing::{debug, info};

use quire_storage::DocumentBackend;

use crate::error::DocumentError;

/// Prefix prepended to a document name by [`DocumentStore::duplicate`].
const COPY_PREFIX: &str = "copy_of_";

/// The document store wrapping a storage backend.
#[derive(Clone)]
pub struct DocumentStore {
    backend: Arc<dyn DocumentBackend>,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore").finish_non_exhaustive()
    }
}

impl DocumentStore {
    /// Create a new document store over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    /// Check that a name is acceptable for a *new* document: non-empty,
    /// ends in `.txt` or `.md`, and carries no path structure.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidName`] if any rule fails.
    pub fn validate_name(name: &str) -> Result<(), DocumentError> {
        Self::guard(name)?;
        if !(name.ends_with(".txt") || name.ends_with(".md")) {
            return Err(DocumentError::InvalidName {
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    /// Traversal guard applied to every operation: the name must be a
    /// plain, non-empty base name.
    fn guard(name: &str) -> Result<(), DocumentError> {
        let flat = !name.is_empty()
            && !name.contains('/')
            && !name.contains('\\')
            && name != "."
            && name != "..";
        if flat {
            Ok(())
        } else {
            Err(DocumentError::InvalidName {
                name: name.to_owned(),
            })
        }
    }

    /// List all document names, in backend order.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] if the backend fails.
    pub async fn list(&self) -> Result<Vec<String>, DocumentError> {
        Ok(self.backend.list().await?)
    }

    /// Check whether a document exists.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] if the backend fails.
    pub async fn exists(&self, name: &str) -> Result<bool, DocumentError> {
        Self::guard(name)?;
        Ok(self.backend.exists(name).await?)
    }

    /// Read a document's contents.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::NotFound`] if the document does not exist.
    /// - [`DocumentError::Storage`] if the backend fails.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, DocumentError> {
        Self::guard(name)?;
        self.backend
            .read(name)
            .await?
            .ok_or_else(|| DocumentError::NotFound {
                name: name.to_owned(),
            })
    }

    /// Create a new document, validating the name first.
    ///
    /// An existing document with the same name is overwritten — name
    /// uniqueness within the store is the filesystem's uniqueness.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::InvalidName`] if the name fails validation.
    /// - [`DocumentError::Storage`] if the backend fails.
    pub async fn create(&self, name: &str, content: &[u8]) -> Result<(), DocumentError> {
        Self::validate_name(name)?;
        self.backend.write(name, content).await?;
        info!(document = %name, bytes = content.len(), "document created");
        Ok(())
    }

    /// Write a document: create if absent, fully overwrite if present.
    ///
    /// No extension validation — editing a pre-seeded document with an
    /// unrecognized extension must keep working.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::InvalidName`] if the name carries path parts.
    /// - [`DocumentError::Storage`] if the backend fails.
    pub async fn write(&self, name: &str, content: &[u8]) -> Result<(), DocumentError> {
        Self::guard(name)?;
        self.backend.write(name, content).await?;
        info!(document = %name, bytes = content.len(), "document written");
        Ok(())
    }

    /// Delete a document.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::NotFound`] if the document does not exist.
    /// - [`DocumentError::Storage`] if the backend fails.
    pub async fn delete(&self, name: &str) -> Result<(), DocumentError> {
        Self::guard(name)?;
        if self.backend.delete(name).await? {
            info!(document = %name, "document deleted");
            Ok(())
        } else {
            Err(DocumentError::NotFound {
                name: name.to_owned(),
            })
        }
    }

    /// Duplicate a document to `copy_of_<name>`, returning the new name.
    ///
    /// An existing copy with that name is silently overwritten.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::NotFound`] if the source does not exist.
    /// - [`DocumentError::Storage`] if the backend fails.
    pub async fn duplicate(&self, name: &str) -> Result<String, DocumentError> {
        let content = self.read(name).await?;
        let copy = format!("{COPY_PREFIX}{name}");

        if self.backend.exists(&copy).await? {
            debug!(document = %copy, "overwriting existing copy");
        }
        self.backend.write(&copy, &content).await?;
        info!(source = %name, copy = %copy, "document duplicated");
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_storage::MemoryBackend;

    fn store() -> DocumentStore {
        DocumentStore::new(Arc::new(MemoryBackend::new()))
    }

    #[test]
    fn validate_name_accepts_recognized_extensions() {
        assert!(DocumentStore::validate_name("about.md").is_ok());
        assert!(DocumentStore::validate_name("history.txt").is_ok());
        assert!(DocumentStore::validate_name("copy_of_about.md").is_ok());
    }

    #[test]
    fn validate_name_rejects_bad_names() {
        assert!(DocumentStore::validate_name("").is_err());
        assert!(DocumentStore::validate_name("notes").is_err());
        assert!(DocumentStore::validate_name("image.png").is_err());
        assert!(DocumentStore::validate_name("a/b.txt").is_err());
        assert!(DocumentStore::validate_name("..\\b.md").is_err());
    }

    #[tokio::test]
    async fn create_then_read_roundtrip() {
        let store = store();
        store.create("about.md", b"# Quire").await.unwrap();
        assert_eq!(store.read("about.md").await.unwrap(), b"# Quire");
    }

    #[tokio::test]
    async fn create_rejects_invalid_name() {
        let store = store();
        let err = store.create("notes", b"x").await.unwrap_err();
        assert!(matches!(err, DocumentError::InvalidName { .. }));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_missing_is_not_found() {
        let err = store().read("ghost.txt").await.unwrap_err();
        assert!(matches!(err, DocumentError::NotFound { .. }));
    }

    #[tokio::test]
    async fn write_does_not_validate_extension() {
        let store = store();
        // Pre-seeded documents with odd extensions stay editable.
        store.write("legacy.ext", b"old").await.unwrap();
        store.write("legacy.ext", b"new").await.unwrap();
        assert_eq!(store.read("legacy.ext").await.unwrap(), b"new");
    }

    #[tokio::test]
    async fn delete_then_read_fails() {
        let store = store();
        store.create("a.txt", b"x").await.unwrap();
        store.delete("a.txt").await.unwrap();
        assert!(!store.exists("a.txt").await.unwrap());
        assert!(matches!(
            store.read("a.txt").await.unwrap_err(),
            DocumentError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let err = store().delete("ghost.txt").await.unwrap_err();
        assert!(matches!(err, DocumentError::NotFound { .. }));
    }

    #[tokio::test]
    async fn duplicate_copies_content() {
        let store = store();
        store.create("x.txt", b"payload").await.unwrap();
        let copy = store.duplicate("x.txt").await.unwrap();
        assert_eq!(copy, "copy_of_x.txt");
        assert_eq!(store.read("copy_of_x.txt").await.unwrap(), b"payload");
        // Source untouched.
        assert_eq!(store.read("x.txt").await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn duplicate_missing_is_not_found() {
        let err = store().duplicate("ghost.txt").await.unwrap_err();
        assert!(matches!(err, DocumentError::NotFound { .. }));
    }

    #[tokio::test]
    async fn duplicate_overwrites_existing_copy() {
        let store = store();
        store.create("x.txt", b"fresh").await.unwrap();
        store.create("copy_of_x.txt", b"stale").await.unwrap();
        store.duplicate("x.txt").await.unwrap();
        assert_eq!(store.read("copy_of_x.txt").await.unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let store = store();
        for name in ["../x.txt", "a/../b.md", "dir\\x.txt", ".."] {
            assert!(matches!(
                store.read(name).await.unwrap_err(),
                DocumentError::InvalidName { .. }
            ));
        }
    }
}
