//! Credential store for Quire.
//!
//! A single JSON file maps usernames to Argon2 PHC hash strings. The file
//! is the unit of persistence: registration loads the whole map, inserts
//! the entry, and rewrites the file by replacement (temp file + rename).
//! Plaintext passwords exist only transiently inside `verify` and
//! `register`; they are never stored or logged.
//!
//! Registration silently overwrites an existing username — a documented
//! quirk of the original system that is preserved here (see DESIGN.md).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::CredentialError;

/// The persisted username → password-hash mapping and its operations.
pub struct CredentialStore {
    path: PathBuf,
    /// Serializes load-modify-save cycles so concurrent registrations
    /// cannot drop each other's entries.
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Create a credential store backed by the given file path.
    ///
    /// The file does not need to exist yet — a missing file loads as an
    /// empty credential set.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Load the full credential mapping.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::Io`] if the file exists but cannot be read.
    /// - [`CredentialError::Parse`] if the contents are not a JSON object
    ///   of strings.
    pub async fn load(&self) -> Result<HashMap<String, String>, CredentialError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(CredentialError::Io {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| CredentialError::Parse {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Replace the credentials file with a serialized form of `entries`.
    ///
    /// Writes a sibling temp file and renames it into place so a reader
    /// never observes a half-written file.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Io`] on any filesystem failure.
    pub async fn save(&self, entries: &HashMap<String, String>) -> Result<(), CredentialError> {
        let io_err = |e: std::io::Error| CredentialError::Io {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        };

        let json = serde_json::to_vec_pretty(entries).map_err(|e| CredentialError::Io {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }

    /// Verify a username/password pair against the stored hashes.
    ///
    /// An unknown username verifies `false` — callers cannot distinguish
    /// it from a wrong password.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Io`] / [`CredentialError::Parse`] if the
    /// credentials file cannot be loaded.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        let entries = self.load().await?;
        Ok(entries
            .get(username)
            .is_some_and(|hash| verify_password(hash, password)))
    }

    /// Register a user: hash the password with a fresh salt, insert or
    /// overwrite the entry, and persist the whole set.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::Hash`] if hashing fails.
    /// - [`CredentialError::Io`] / [`CredentialError::Parse`] on file
    ///   failures.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await?;
        let hash = hash_password(password)?;
        if entries.insert(username.to_owned(), hash).is_some() {
            // Preserved original behavior: no uniqueness check.
            warn!(username = %username, "registration replaced an existing user");
        }
        self.save(&entries).await?;

        info!(username = %username, total = entries.len(), "user registered");
        Ok(())
    }
}

/// Hash a password into a PHC string with a fresh random salt.
fn hash_password(password: &str) -> Result<String, CredentialError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| CredentialError::Hash {
        reason: e.to_string(),
    })?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| CredentialError::Hash {
        reason: e.to_string(),
    })?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| CredentialError::Hash {
            reason: e.to_string(),
        })
}

/// Verify a password against a stored PHC string.
///
/// A malformed stored hash verifies `false` rather than erroring — a
/// corrupted entry should deny access, not break sign-in for everyone.
fn verify_password(hash: &str, password: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
