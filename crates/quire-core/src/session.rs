//! Session store for Quire.
//!
//! Sessions are server-side entries keyed by an opaque token (UUID v4,
//! OS CSPRNG). An entry holds at most one authenticated username and at
//! most one flash message; the flash is consumed by exactly one read.
//! Entries expire after a fixed TTL — expired tokens behave like unknown
//! tokens and are dropped on lookup. A periodic sweep removes entries
//! that expire without ever being looked up again.
//!
//! All state lives in this struct — nothing is ambient — so tests can
//! drive sessions deterministically without a running server.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

/// A snapshot of one session's state.
#[derive(Debug, Clone)]
pub struct Session {
    /// Authenticated username, `None` while anonymous.
    pub username: Option<String>,
    /// When the session stops being honored.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug)]
struct SessionEntry {
    username: Option<String>,
    flash: Option<String>,
    expires_at: DateTime<Utc>,
}

/// In-memory session store with TTL expiry.
pub struct SessionStore {
    ttl: Duration,
    entries: RwLock<HashMap<String, SessionEntry>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a session store with the given time-to-live per session.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Issue a fresh anonymous session and return its token.
    pub async fn create(&self) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let entry = SessionEntry {
            username: None,
            flash: None,
            expires_at: Utc::now() + self.ttl,
        };
        self.entries.write().await.insert(token.clone(), entry);
        token
    }

    /// Look up a session. Unknown and expired tokens both return `None`;
    /// an expired entry is removed as a side effect.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        {
            let entries = self.entries.read().await;
            match entries.get(token) {
                Some(entry) if entry.expires_at > now => {
                    return Some(Session {
                        username: entry.username.clone(),
                        expires_at: entry.expires_at,
                    });
                }
                Some(_) => {}
                None => return None,
            }
        }
        self.entries.write().await.remove(token);
        None
    }

    /// The authenticated username for a token, if any.
    pub async fn username(&self, token: &str) -> Option<String> {
        self.get(token).await.and_then(|s| s.username)
    }

    /// Attach a username to a live session. No-op for unknown tokens.
    pub async fn set_username(&self, token: &str, username: &str) {
        if let Some(entry) = self.entries.write().await.get_mut(token) {
            entry.username = Some(username.to_owned());
        }
    }

    /// Clear the username, returning the session to anonymous.
    pub async fn clear_username(&self, token: &str) {
        if let Some(entry) = self.entries.write().await.get_mut(token) {
            entry.username = None;
        }
    }

    /// Set the one-shot flash message, replacing any unconsumed one.
    pub async fn set_flash(&self, token: &str, message: &str) {
        if let Some(entry) = self.entries.write().await.get_mut(token) {
            entry.flash = Some(message.to_owned());
        }
    }

    /// Consume the flash message — at most one caller observes it.
    pub async fn take_flash(&self, token: &str) -> Option<String> {
        self.entries
            .write()
            .await
            .get_mut(token)
            .and_then(|entry| entry.flash.take())
    }

    /// Drop a session entirely.
    pub async fn destroy(&self, token: &str) {
        self.entries.write().await.remove(token);
    }

    /// Remove every expired entry, returning how many were dropped.
    /// Called by the background sweep.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let dropped = before - entries.len();
        if dropped > 0 {
            debug!(dropped, remaining = entries.len(), "expired sessions purged");
        }
        dropped
    }
}
