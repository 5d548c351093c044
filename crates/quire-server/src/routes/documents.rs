//! Document routes: listing, viewing, and the four mutating actions.
//!
//! Viewing and listing are public; everything that creates, changes, or
//! removes a document goes through the signed-in guard first. Every
//! expected failure is recovered here as a flash message + redirect —
//! only storage-level surprises escape as [`AppError`].

use std::sync::Arc;

use axum::extract::{Extension, Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use quire_core::error::{DocumentError, RenderError};
use quire_core::render::render;

use crate::error::AppError;
use crate::middleware::SessionContext;
use crate::routes::{flash_redirect, require_signed_in};
use crate::state::AppState;
use crate::views;

/// Build the document router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_documents))
        .route("/new", get(new_document_form).post(create_document))
        .route("/{name}", get(view_document))
        .route("/{name}/edit", get(edit_document_form).post(update_document))
        .route("/{name}/delete", post(delete_document))
        .route("/{name}/duplicate", post(duplicate_document))
}

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateDocumentInput {
    pub filename: String,
    #[serde(default)]
    pub contents: String,
}

#[derive(Debug, Deserialize)]
pub struct EditDocumentInput {
    #[serde(default)]
    pub contents: String,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// `GET /` — list all documents.
async fn list_documents(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, AppError> {
    let names = state.documents.list().await?;
    let flash = state.sessions.take_flash(&session.token).await;
    let user = state.auth.current_user(&session.token).await;
    Ok(views::index_page(flash.as_deref(), user.as_deref(), &names))
}

/// `GET /{name}` — render one document by its extension.
async fn view_document(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let content = match state.documents.read(&name).await {
        Ok(content) => content,
        Err(DocumentError::NotFound { .. } | DocumentError::InvalidName { .. }) => {
            let message = format!("{name} does not exist.");
            return Ok(flash_redirect(&state, &session, &message, "/").await);
        }
        Err(err) => return Err(err.into()),
    };

    match render(&name, &content) {
        Ok(rendered) => Ok((
            [(header::CONTENT_TYPE, rendered.content_type)],
            rendered.body,
        )
            .into_response()),
        Err(RenderError::UnsupportedType { .. }) => {
            let message = format!("{name} cannot be displayed.");
            Ok(flash_redirect(&state, &session, &message, "/").await)
        }
    }
}

/// `GET /new` — the create form (signed-in only).
async fn new_document_form(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    let user = match require_signed_in(&state, &session).await {
        Ok(user) => user,
        Err(refused) => return refused,
    };
    let flash = state.sessions.take_flash(&session.token).await;
    views::new_document_page(flash.as_deref(), Some(&user)).into_response()
}

/// `POST /new` — create a document.
async fn create_document(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Form(input): Form<CreateDocumentInput>,
) -> Result<Response, AppError> {
    if let Err(refused) = require_signed_in(&state, &session).await {
        return Ok(refused);
    }

    match state
        .documents
        .create(&input.filename, input.contents.as_bytes())
        .await
    {
        Ok(()) => {
            let message = format!("{} has been created.", input.filename);
            Ok(flash_redirect(&state, &session, &message, "/").await)
        }
        Err(DocumentError::InvalidName { .. }) => Ok(flash_redirect(
            &state,
            &session,
            "A filename and either .txt or .md extension are required.",
            "/new",
        )
        .await),
        Err(err) => Err(err.into()),
    }
}

/// `GET /{name}/edit` — the edit form (signed-in only).
async fn edit_document_form(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let user = match require_signed_in(&state, &session).await {
        Ok(user) => user,
        Err(refused) => return Ok(refused),
    };

    match state.documents.read(&name).await {
        Ok(content) => {
            let flash = state.sessions.take_flash(&session.token).await;
            let text = String::from_utf8_lossy(&content);
            Ok(
                views::edit_document_page(flash.as_deref(), Some(&user), &name, &text)
                    .into_response(),
            )
        }
        Err(DocumentError::NotFound { .. } | DocumentError::InvalidName { .. }) => {
            let message = format!("{name} does not exist.");
            Ok(flash_redirect(&state, &session, &message, "/").await)
        }
        Err(err) => Err(err.into()),
    }
}

/// `POST /{name}/edit` — full overwrite (creates the file if absent).
async fn update_document(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(name): Path<String>,
    Form(input): Form<EditDocumentInput>,
) -> Result<Response, AppError> {
    if let Err(refused) = require_signed_in(&state, &session).await {
        return Ok(refused);
    }

    match state.documents.write(&name, input.contents.as_bytes()).await {
        Ok(()) => {
            let message = format!("{name} has been updated.");
            Ok(flash_redirect(&state, &session, &message, "/").await)
        }
        Err(DocumentError::InvalidName { .. }) => {
            let message = format!("{name} does not exist.");
            Ok(flash_redirect(&state, &session, &message, "/").await)
        }
        Err(err) => Err(err.into()),
    }
}

/// `POST /{name}/delete` — remove a document.
async fn delete_document(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    if let Err(refused) = require_signed_in(&state, &session).await {
        return Ok(refused);
    }

    match state.documents.delete(&name).await {
        Ok(()) => {
            let message = format!("{name} has been deleted.");
            Ok(flash_redirect(&state, &session, &message, "/").await)
        }
        Err(DocumentError::NotFound { .. } | DocumentError::InvalidName { .. }) => {
            let message = format!("{name} does not exist.");
            Ok(flash_redirect(&state, &session, &message, "/").await)
        }
        Err(err) => Err(err.into()),
    }
}

/// `POST /{name}/duplicate` — copy a document to `copy_of_{name}`.
async fn duplicate_document(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    if let Err(refused) = require_signed_in(&state, &session).await {
        return Ok(refused);
    }

    match state.documents.duplicate(&name).await {
        Ok(_copy) => {
            let message = format!("{name} has been duplicated.");
            Ok(flash_redirect(&state, &session, &message, "/").await)
        }
        Err(DocumentError::NotFound { .. } | DocumentError::InvalidName { .. }) => {
            let message = format!("{name} does not exist.");
            Ok(flash_redirect(&state, &session, &message, "/").await)
        }
        Err(err) => Err(err.into()),
    }
}
