//! Session cookie middleware for Quire.
//!
//! Every request gets a live session: the middleware reads the
//! `quire_session` cookie, validates the token against the session store,
//! and mints a fresh anonymous session (setting the cookie on the
//! response) when the request arrives without one — or with one that has
//! expired. The resulting [`SessionContext`] is injected into request
//! extensions for downstream handlers.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "quire_session";

/// Session context injected into request extensions.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// The session token — the key for every session store call.
    pub token: String,
}

/// Middleware that guarantees a live session per request.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let presented = session_cookie(req.headers());

    let (token, minted) = match presented {
        Some(token) if state.sessions.get(&token).await.is_some() => (token, false),
        _ => (state.sessions.create().await, true),
    };

    req.extensions_mut().insert(SessionContext {
        token: token.clone(),
    });

    let mut res = next.run(req).await;

    if minted {
        let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            res.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    res
}

/// Extract the session token from the `Cookie` header, if present.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_session_cookie() {
        let headers = headers_with_cookie("quire_session=abc123");
        assert_eq!(session_cookie(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn extracts_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; quire_session=tok; lang=en");
        assert_eq!(session_cookie(&headers).as_deref(), Some("tok"));
    }

    #[test]
    fn missing_cookie_is_none() {
        assert_eq!(session_cookie(&HeaderMap::new()), None);
        let headers = headers_with_cookie("theme=dark");
        assert_eq!(session_cookie(&headers), None);
    }
}
