//! HTTP error boundary for the Quire server.
//!
//! Expected domain outcomes (missing document, invalid filename, refused
//! anonymous mutation, bad credentials) are recovered inside the handlers
//! as flash message + redirect — they never reach this type. `AppError`
//! is the residue: conditions the user cannot fix, surfaced as a plain
//! error page and logged server-side.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use quire_core::error::{AuthError, CredentialError, DocumentError};

use crate::views;

/// Unrecoverable application error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Requested resource not found (also the fallback route).
    NotFound,
    /// Anything the user cannot fix: storage failures, credential file
    /// corruption.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, views::not_found_page()).into_response(),
            Self::Internal(reason) => {
                error!(reason = %reason, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, views::error_page()).into_response()
            }
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound { .. } | DocumentError::InvalidName { .. } => Self::NotFound,
            DocumentError::Storage(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self::Internal(err.to_string())
    }
}
