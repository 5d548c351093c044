//! Filesystem document backend — the production default.
//!
//! One file per document in a single flat directory. Paths are composed
//! from the base-name component of the document name only, so a name that
//! somehow carries directory parts can never address a file outside the
//! store directory.
//!
//! Concurrent `write`/`delete` calls for the same name are serialized
//! through a lazily-populated per-name lock map; writes to different
//! names do not contend. Reads are unserialized — last-writer-wins is an
//! accepted property of the store (see the concurrency notes in
//! DESIGN.md).

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::{DocumentBackend, StorageError};

/// A document backend rooted at a flat directory.
///
/// Cheap to clone — clones share the root path and the lock map.
#[derive(Clone)]
pub struct FsBackend {
    root: PathBuf,
    locks: Arc<RwLock<HashMap<String, Arc<Mutex<()>>>>>,
}

impl std::fmt::Debug for FsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsBackend")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl FsBackend {
    /// Open a document store rooted at the given directory.
    ///
    /// Creates the directory (and any missing parents) if it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the directory cannot be created.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| StorageError::Open {
                path: root.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(root = %root.display(), "document store opened");

        Ok(Self {
            root,
            locks: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Return the directory this store is rooted at.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compose the on-disk path for a document name.
    ///
    /// Only the base-name component of `name` is used — directory parts
    /// are discarded, never resolved.
    fn document_path(&self, name: &str) -> PathBuf {
        let base = Path::new(name)
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        self.root.join(base)
    }

    /// Fetch (or lazily create) the mutation lock for a name.
    async fn lock_for(&self, name: &str) -> Arc<Mutex<()>> {
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(name) {
                return Arc::clone(lock);
            }
        }
        let mut locks = self.locks.write().await;
        Arc::clone(locks.entry(name.to_owned()).or_default())
    }
}

#[async_trait::async_trait]
impl DocumentBackend for FsBackend {
    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let map_err = |e: std::io::Error| StorageError::List {
            path: self.root.display().to_string(),
            reason: e.to_string(),
        };

        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(map_err)?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(map_err)? {
            let is_file = entry.file_type().await.map_err(map_err)?.is_file();
            if is_file {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match tokio::fs::read(self.document_path(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                name: name.to_owned(),
                reason: e.to_string(),
            }),
        }
    }

    async fn write(&self, name: &str, content: &[u8]) -> Result<(), StorageError> {
        let lock = self.lock_for(name).await;
        let _guard = lock.lock().await;

        tokio::fs::write(self.document_path(name), content)
            .await
            .map_err(|e| StorageError::Write {
                name: name.to_owned(),
                reason: e.to_string(),
            })
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let lock = self.lock_for(name).await;
        let _guard = lock.lock().await;

        match tokio::fs::remove_file(self.document_path(name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Delete {
                name: name.to_owned(),
                reason: e.to_string(),
            }),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        match tokio::fs::metadata(self.document_path(name)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Read {
                name: name.to_owned(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_temp() -> (FsBackend, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::open(dir.path().join("docs")).await.unwrap();
        (backend, dir)
    }

    #[tokio::test]
    async fn open_creates_missing_directory() {
        let (backend, _dir) = open_temp().await;
        assert!(backend.root().is_dir());
    }

    #[tokio::test]
    async fn write_then_read_roundtrip() {
        let (backend, _dir) = open_temp().await;
        backend.write("about.md", b"# hello").await.unwrap();
        let val = backend.read("about.md").await.unwrap();
        assert_eq!(val, Some(b"# hello".to_vec()));
    }

    #[tokio::test]
    async fn read_missing_returns_none() {
        let (backend, _dir) = open_temp().await;
        assert_eq!(backend.read("nope.txt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_overwrites_fully() {
        let (backend, _dir) = open_temp().await;
        backend.write("a.txt", b"long original content").await.unwrap();
        backend.write("a.txt", b"new").await.unwrap();
        assert_eq!(backend.read("a.txt").await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let (backend, _dir) = open_temp().await;
        backend.write("a.txt", b"x").await.unwrap();
        assert!(backend.delete("a.txt").await.unwrap());
        assert!(!backend.delete("a.txt").await.unwrap());
        assert!(!backend.exists("a.txt").await.unwrap());
    }

    #[tokio::test]
    async fn list_returns_file_names() {
        let (backend, _dir) = open_temp().await;
        backend.write("about.md", b"").await.unwrap();
        backend.write("history.txt", b"").await.unwrap();

        let mut names = backend.list().await.unwrap();
        names.sort();
        assert_eq!(names, vec!["about.md", "history.txt"]);
    }

    #[tokio::test]
    async fn path_parts_in_names_cannot_escape_root() {
        let (backend, dir) = open_temp().await;
        backend.write("../escape.txt", b"trapped").await.unwrap();

        // The write landed inside the store under the base name only.
        assert_eq!(
            backend.read("escape.txt").await.unwrap(),
            Some(b"trapped".to_vec())
        );
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn clone_shares_store() {
        let (backend, _dir) = open_temp().await;
        let clone = backend.clone();
        backend.write("a.txt", b"shared").await.unwrap();
        assert_eq!(clone.read("a.txt").await.unwrap(), Some(b"shared".to_vec()));
    }
}
