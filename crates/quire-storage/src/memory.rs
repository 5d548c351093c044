//! In-memory document backend for testing.
//!
//! Stores all documents in a `BTreeMap` behind a `RwLock`. Nothing is
//! persisted — all documents are lost when the process exits. Use this for
//! unit tests and integration tests that need a real backend without
//! touching disk.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{DocumentBackend, StorageError};

/// An in-memory document backend backed by a `BTreeMap`.
///
/// Thread-safe and async-compatible. Clones share the same underlying map.
///
/// # Examples
///
/// ```
/// # use quire_storage::{DocumentBackend, MemoryBackend};
/// # #[tokio::main]
/// # async fn main() {
/// let backend = MemoryBackend::new();
/// backend.write("about.md", b"# Quire").await.unwrap();
/// let val = backend.read("about.md").await.unwrap();
/// assert_eq!(val, Some(b"# Quire".to_vec()));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    documents: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    /// Create a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DocumentBackend for MemoryBackend {
    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let documents = self.documents.read().await;
        Ok(documents.keys().cloned().collect())
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let documents = self.documents.read().await;
        Ok(documents.get(name).cloned())
    }

    async fn write(&self, name: &str, content: &[u8]) -> Result<(), StorageError> {
        let mut documents = self.documents.write().await;
        documents.insert(name.to_owned(), content.to_vec());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let mut documents = self.documents.write().await;
        Ok(documents.remove(name).is_some())
    }

    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let documents = self.documents.read().await;
        Ok(documents.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_nonexistent_returns_none() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.read("missing.txt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_and_read_roundtrip() {
        let backend = MemoryBackend::new();
        backend.write("history.txt", b"hello").await.unwrap();
        let val = backend.read("history.txt").await.unwrap();
        assert_eq!(val, Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn write_overwrites_existing() {
        let backend = MemoryBackend::new();
        backend.write("a.txt", b"v1").await.unwrap();
        backend.write("a.txt", b"v2").await.unwrap();
        assert_eq!(backend.read("a.txt").await.unwrap(), Some(b"v2".to_vec()));
    }

    #[tokio::test]
    async fn delete_existing_returns_true() {
        let backend = MemoryBackend::new();
        backend.write("a.txt", b"x").await.unwrap();
        assert!(backend.delete("a.txt").await.unwrap());
        assert_eq!(backend.read("a.txt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_nonexistent_returns_false() {
        let backend = MemoryBackend::new();
        assert!(!backend.delete("nope.txt").await.unwrap());
    }

    #[tokio::test]
    async fn list_returns_all_names() {
        let backend = MemoryBackend::new();
        backend.write("about.md", b"1").await.unwrap();
        backend.write("changes.txt", b"2").await.unwrap();
        let names = backend.list().await.unwrap();
        assert_eq!(names, vec!["about.md", "changes.txt"]);
    }

    #[tokio::test]
    async fn exists_tracks_presence() {
        let backend = MemoryBackend::new();
        assert!(!backend.exists("a.txt").await.unwrap());
        backend.write("a.txt", b"x").await.unwrap();
        assert!(backend.exists("a.txt").await.unwrap());
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let backend = MemoryBackend::new();
        let clone = backend.clone();
        backend.write("a.txt", b"shared").await.unwrap();
        assert_eq!(clone.read("a.txt").await.unwrap(), Some(b"shared".to_vec()));
    }
}
