//! Shared application state for the Quire server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It holds the document store, credential store,
//! session store, and the auth gate.

use std::sync::Arc;

use quire_core::auth::AuthGate;
use quire_core::credentials::CredentialStore;
use quire_core::document::DocumentStore;
use quire_core::session::SessionStore;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Flat-file document operations.
    pub documents: DocumentStore,
    /// Username → password-hash file operations.
    pub credentials: Arc<CredentialStore>,
    /// Server-side session entries (username + flash).
    pub sessions: Arc<SessionStore>,
    /// Sign-in/sign-out transitions and the signed-in guard.
    pub auth: AuthGate,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
