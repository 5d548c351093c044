//! HTTP routes for Quire.
//!
//! `router` assembles the whole application — document pages at the root,
//! user routes under `/users`, the 404 fallback, and the session cookie
//! middleware — so the binary and the integration tests serve the same
//! app.

pub mod documents;
pub mod users;

use std::sync::Arc;

use axum::Router;
use axum::http::{StatusCode, header};
use axum::middleware as axum_mw;
use axum::response::{IntoResponse, Response};

use crate::middleware::{SessionContext, session_middleware};
use crate::state::AppState;
use crate::views;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(documents::router())
        .nest("/users", users::router())
        .fallback(not_found)
        .layer(axum_mw::from_fn_with_state(
            Arc::clone(&state),
            session_middleware,
        ))
        .with_state(state)
}

/// Catch-all for unknown paths.
async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, views::not_found_page()).into_response()
}

// ── Handler helpers ──────────────────────────────────────────────────

/// A plain `302 Found` redirect — the status every browser-facing
/// redirect in this app uses.
pub(crate) fn redirect(to: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, to.to_owned())], ()).into_response()
}

/// Set the one-shot flash message on the session, then redirect.
pub(crate) async fn flash_redirect(
    state: &AppState,
    session: &SessionContext,
    message: &str,
    to: &str,
) -> Response {
    state.sessions.set_flash(&session.token, message).await;
    redirect(to)
}

/// Guard for protected actions: the signed-in username, or the standard
/// refusal (flash + redirect to the listing).
pub(crate) async fn require_signed_in(
    state: &AppState,
    session: &SessionContext,
) -> Result<String, Response> {
    match state.auth.require_authenticated(&session.token).await {
        Ok(username) => Ok(username),
        Err(_) => Err(flash_redirect(state, session, "You must be signed in to do that.", "/").await),
    }
}
