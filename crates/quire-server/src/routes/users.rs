//! User routes: sign-in, sign-out, and registration.
//!
//! A failed sign-in re-renders the form with `422 Unprocessable Entity`
//! and the message inline, so the user corrects input in place; every
//! other outcome is a flash + redirect. Registration signs the new user
//! in immediately.

use std::sync::Arc;

use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use quire_core::error::AuthError;

use crate::error::AppError;
use crate::middleware::SessionContext;
use crate::routes::flash_redirect;
use crate::state::AppState;
use crate::views;

/// Build the `/users` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signin", get(signin_form).post(signin))
        .route("/signout", post(signout))
        .route("/register", get(register_form).post(register))
}

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignInInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// `GET /users/signin` — the sign-in form.
async fn signin_form(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    let flash = state.sessions.take_flash(&session.token).await;
    let user = state.auth.current_user(&session.token).await;
    views::signin_page(flash.as_deref(), user.as_deref(), "").into_response()
}

/// `POST /users/signin` — authenticate the session.
async fn signin(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Form(input): Form<SignInInput>,
) -> Result<Response, AppError> {
    match state
        .auth
        .sign_in(&session.token, &input.username, &input.password)
        .await
    {
        Ok(()) => Ok(flash_redirect(&state, &session, "Welcome!", "/").await),
        Err(AuthError::InvalidCredentials) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            views::signin_page(Some("Invalid credentials"), None, &input.username),
        )
            .into_response()),
        Err(err) => Err(err.into()),
    }
}

/// `POST /users/signout` — return the session to anonymous.
async fn signout(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    state.auth.sign_out(&session.token).await;
    flash_redirect(&state, &session, "You have been signed out.", "/").await
}

/// `GET /users/register` — the registration form.
async fn register_form(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    let flash = state.sessions.take_flash(&session.token).await;
    let user = state.auth.current_user(&session.token).await;
    views::register_page(flash.as_deref(), user.as_deref()).into_response()
}

/// `POST /users/register` — create the credential entry and sign the new
/// user in. An existing username is silently replaced (preserved quirk,
/// see DESIGN.md).
async fn register(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Form(input): Form<RegisterInput>,
) -> Result<Response, AppError> {
    state
        .credentials
        .register(&input.username, &input.password)
        .await?;
    state
        .sessions
        .set_username(&session.token, &input.username)
        .await;

    let message = format!("Welcome aboard, {}!", input.username);
    Ok(flash_redirect(&state, &session, &message, "/").await)
}
