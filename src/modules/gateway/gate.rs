use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use log::{debug, error};
use std::sync::Arc;

use super::{redirect, AppState};
use crate::modules::auth::cookie::extract_session_cookie;
use crate::modules::auth::tokens::verify_session;
use crate::modules::error::PortalError;
use crate::PROTECTED_PREFIXES;

/// Whether a request path falls under a protected prefix.
pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Request gate middleware.
///
/// Unprotected paths pass through without any session lookup. Protected
/// paths require a verifiable, unexpired session cookie; on success the
/// decoded session is attached to the request extensions for downstream
/// handlers, otherwise the request is denied: a redirect to the login
/// surface for portal pages, a status code for API routes. Verification
/// runs on every request; tokens are cheap to check and nothing is cached.
pub async fn session_gate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if !is_protected(path) {
        return next.run(request).await;
    }
    let api_route = path.starts_with("/api/");

    // Fail closed: without a signing secret no session can be trusted.
    let secret = state.config.session_secret.as_str();
    if secret.is_empty() {
        error!("Session secret is not configured; refusing protected request");
        if api_route {
            return PortalError::Configuration("session secret is not configured".to_string())
                .into_response();
        }
        return redirect("/login?error=server");
    }

    let cookie_header = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());
    let Some(token) = extract_session_cookie(cookie_header) else {
        return deny(api_route);
    };

    match verify_session(&token, secret) {
        Ok(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(reason) => {
            debug!("Rejected session cookie: {:?}", reason);
            deny(api_route)
        }
    }
}

/// Uniform denial: no distinction between a missing cookie, a bad
/// signature, and an expired token is visible to the client.
fn deny(api_route: bool) -> Response {
    if api_route {
        PortalError::TokenInvalid.into_response()
    } else {
        redirect("/login")
    }
}
