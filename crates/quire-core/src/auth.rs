//! Auth gate for Quire.
//!
//! Each session is in one of two states: anonymous, or authenticated as a
//! username. The gate is the only component allowed to flip that state —
//! handlers call [`AuthGate::require_authenticated`] before every mutating
//! document operation and before showing the new/edit forms. Viewing and
//! listing documents require nothing.

use std::sync::Arc;

use tracing::info;

use crate::credentials::CredentialStore;
use crate::error::AuthError;
use crate::session::SessionStore;

/// Sign-in, sign-out, and the signed-in guard.
#[derive(Clone)]
pub struct AuthGate {
    sessions: Arc<SessionStore>,
    credentials: Arc<CredentialStore>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate").finish_non_exhaustive()
    }
}

impl AuthGate {
    /// Create an auth gate over the given session and credential stores.
    #[must_use]
    pub fn new(sessions: Arc<SessionStore>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            sessions,
            credentials,
        }
    }

    /// Authenticate a session: the session becomes `Authenticated(username)`
    /// iff the credentials verify; otherwise it stays anonymous.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidCredentials`] if the pair does not verify.
    /// - [`AuthError::Credential`] if the credential store fails.
    pub async fn sign_in(
        &self,
        token: &str,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        if self.credentials.verify(username, password).await? {
            self.sessions.set_username(token, username).await;
            info!(username = %username, "signed in");
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Return the session to anonymous. Signing out an anonymous session
    /// is a no-op.
    pub async fn sign_out(&self, token: &str) {
        if let Some(username) = self.sessions.username(token).await {
            info!(username = %username, "signed out");
        }
        self.sessions.clear_username(token).await;
    }

    /// The authenticated username for this session, if any.
    pub async fn current_user(&self, token: &str) -> Option<String> {
        self.sessions.username(token).await
    }

    /// Guard for protected operations: the authenticated username, or
    /// [`AuthError::Required`] for anonymous (and expired) sessions.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Required`] if the session is anonymous.
    pub async fn require_authenticated(&self, token: &str) -> Result<String, AuthError> {
        self.sessions
            .username(token)
            .await
            .ok_or(AuthError::Required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn gate_with_user(
        username: &str,
        password: &str,
    ) -> (AuthGate, Arc<SessionStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let credentials = Arc::new(CredentialStore::new(dir.path().join("users.json")));
        credentials.register(username, password).await.unwrap();
        let sessions = Arc::new(SessionStore::new(Duration::hours(1)));
        let gate = AuthGate::new(Arc::clone(&sessions), credentials);
        (gate, sessions, dir)
    }

    #[tokio::test]
    async fn sign_in_transitions_to_authenticated() {
        let (gate, sessions, _dir) = gate_with_user("admin", "secret").await;
        let token = sessions.create().await;

        gate.sign_in(&token, "admin", "secret").await.unwrap();
        assert_eq!(gate.current_user(&token).await.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn wrong_password_stays_anonymous() {
        let (gate, sessions, _dir) = gate_with_user("admin", "secret").await;
        let token = sessions.create().await;

        let err = gate.sign_in(&token, "admin", "nope").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(gate.current_user(&token).await, None);
    }

    #[tokio::test]
    async fn unknown_user_stays_anonymous() {
        let (gate, sessions, _dir) = gate_with_user("admin", "secret").await;
        let token = sessions.create().await;

        let err = gate.sign_in(&token, "ghost", "secret").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(gate.current_user(&token).await, None);
    }

    #[tokio::test]
    async fn sign_out_from_any_state() {
        let (gate, sessions, _dir) = gate_with_user("admin", "secret").await;
        let token = sessions.create().await;

        // Anonymous sign-out is a no-op.
        gate.sign_out(&token).await;
        assert_eq!(gate.current_user(&token).await, None);

        gate.sign_in(&token, "admin", "secret").await.unwrap();
        gate.sign_out(&token).await;
        assert_eq!(gate.current_user(&token).await, None);
    }

    #[tokio::test]
    async fn require_authenticated_refuses_anonymous() {
        let (gate, sessions, _dir) = gate_with_user("admin", "secret").await;
        let token = sessions.create().await;

        assert!(matches!(
            gate.require_authenticated(&token).await.unwrap_err(),
            AuthError::Required
        ));

        gate.sign_in(&token, "admin", "secret").await.unwrap();
        assert_eq!(gate.require_authenticated(&token).await.unwrap(), "admin");
    }

    #[tokio::test]
    async fn expired_session_requires_auth_again() {
        let dir = tempfile::tempdir().unwrap();
        let credentials = Arc::new(CredentialStore::new(dir.path().join("users.json")));
        credentials.register("admin", "secret").await.unwrap();
        let sessions = Arc::new(SessionStore::new(Duration::seconds(-1)));
        let gate = AuthGate::new(Arc::clone(&sessions), credentials);

        let token = sessions.create().await;
        assert!(gate.require_authenticated(&token).await.is_err());
    }
}
