//! HTTP gateway for the pilot portal.
//!
//! axum-based server exposing the login/logout flow, the protected portal
//! page, and the gated order endpoints. Body limits and request timeouts
//! are applied router-wide; the session gate middleware guards every
//! protected prefix.

pub mod gate;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, patch, post};
use axum::{Extension, Router};
use log::error;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::modules::auth::cookie::{build_clear_cookie, build_set_cookie};
use crate::modules::auth::store::authenticate;
use crate::modules::auth::tokens::{issue_session, Session};
use crate::modules::config::AppConfig;
use crate::modules::error::PortalError;
use crate::modules::orders::{ensure_owned_by, OrdersClient};
use crate::modules::utils::logging::{log_auth_event, log_record_operation};
use crate::modules::utils::time::format_timestamp;

/// Maximum request body size (16KB); login forms and order field patches
/// are small.
pub const MAX_BODY_SIZE: usize = 16_384;
/// Request timeout for inbound requests.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared state handed to every handler.
pub struct AppState {
    pub config: AppConfig,
    pub orders: Option<OrdersClient>,
}

/// Run the gateway until the process is stopped.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let orders = match config.record_store.as_ref() {
        Some(store_config) => Some(OrdersClient::new(store_config)?),
        None => None,
    };
    let state = Arc::new(AppState { config, orders });

    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Pilot portal listening on {}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/login", get(handle_login_page))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/portal", get(handle_portal))
        .route("/api/orders", get(handle_orders_list))
        .route("/api/orders/{record_id}", patch(handle_order_update))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            gate::session_gate,
        ))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
        .with_state(state)
}

/// 302 redirect with no body.
pub(crate) fn redirect(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

/// 302 redirect carrying a Set-Cookie header.
fn redirect_with_cookie(location: &str, cookie: String) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, cookie),
        ],
    )
        .into_response()
}

async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /login — minimal login surface.
async fn handle_login_page(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    let notice = match params.get("error").map(String::as_str) {
        Some("missing") => "<p class=\"error\">Enter both email and password.</p>",
        Some("invalid") => "<p class=\"error\">Invalid email or password.</p>",
        Some("server") => "<p class=\"error\">Something went wrong on our side. Try again shortly.</p>",
        _ => "",
    };

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Pilot login</title></head>\n<body>\n\
         <h1>Pilot portal</h1>\n{}\n\
         <form method=\"post\" action=\"/login\">\n\
         <label>Email <input type=\"email\" name=\"email\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n</body>\n</html>",
        notice
    ))
}

/// Login request body; accepted form-encoded or as JSON.
#[derive(Debug, Deserialize)]
struct LoginForm {
    email: Option<String>,
    password: Option<String>,
}

/// Parse the login body according to its content type.
fn parse_login_body(headers: &HeaderMap, body: &[u8]) -> Option<LoginForm> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/json") {
        serde_json::from_slice(body).ok()
    } else {
        serde_urlencoded::from_bytes(body).ok()
    }
}

/// POST /login — authenticate and issue a session cookie.
///
/// Every outcome is a 302: success to the portal, failure back to the
/// login page with an error query parameter.
async fn handle_login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let form = parse_login_body(&headers, &body);
    let (email, password) = match form {
        Some(LoginForm {
            email: Some(email),
            password: Some(password),
        }) if !email.is_empty() && !password.is_empty() => (email, password),
        _ => return redirect("/login?error=missing"),
    };

    if state.config.session_secret.is_empty() {
        error!("Session secret is not configured; cannot issue sessions");
        return redirect("/login?error=server");
    }

    // PBKDF2 is deliberately slow; keep it off the async worker threads.
    let raw_config = state.config.pilot_credentials.clone();
    let attempt_email = email.clone();
    let attempt = tokio::task::spawn_blocking(move || {
        authenticate(&attempt_email, &password, raw_config.as_deref())
    })
    .await;

    let credential = match attempt {
        Ok(Some(credential)) => credential,
        Ok(None) => {
            let failure = PortalError::AuthenticationFailure;
            log_auth_event("login", &email, false, Some(&failure.to_string()));
            return redirect("/login?error=invalid");
        }
        Err(e) => {
            error!("Password verification task failed: {}", e);
            return redirect("/login?error=server");
        }
    };

    match issue_session(
        &credential.email,
        &credential.name,
        &state.config.session_secret,
    ) {
        Ok(token) => {
            log_auth_event("login", &credential.email, true, None);
            redirect_with_cookie("/portal", build_set_cookie(&token))
        }
        Err(e) => {
            error!("Failed to issue session token: {}", e);
            redirect("/login?error=server")
        }
    }
}

/// POST /logout — clear the session cookie.
///
/// The token itself stays valid until expiry; without a revocation list,
/// logout only instructs the client to forget it.
async fn handle_logout() -> Response {
    log_auth_event("logout", "-", true, None);
    redirect_with_cookie("/login", build_clear_cookie())
}

/// GET /portal — the protected landing page.
async fn handle_portal(Extension(session): Extension<Session>) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Pilot portal</title></head>\n<body>\n\
         <h1>Welcome, {}</h1>\n\
         <p>Signed in as {} until {}.</p>\n\
         <p><a href=\"/api/orders\">My orders</a></p>\n\
         <form method=\"post\" action=\"/logout\"><button type=\"submit\">Log out</button></form>\n\
         </body>\n</html>",
        session.name,
        session.email,
        format_timestamp(session.exp)
    ))
}

/// GET /api/orders — list the records owned by the session identity.
async fn handle_orders_list(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Response {
    let Some(client) = state.orders.as_ref() else {
        return PortalError::Configuration("record store is not configured".to_string())
            .into_response();
    };

    match client.list_orders_for(&session.name).await {
        Ok(records) => Json(serde_json::json!({ "records": records })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// PATCH /api/orders/{record_id} — mutate a record after the ownership check.
async fn handle_order_update(
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<String>,
    Extension(session): Extension<Session>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let Some(client) = state.orders.as_ref() else {
        return PortalError::Configuration("record store is not configured".to_string())
            .into_response();
    };

    let Ok(Json(fields)) = body else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "request body must be a JSON object of fields" })),
        )
            .into_response();
    };

    // Ownership is checked against the record as it exists right now.
    let record = match client.fetch_order(&record_id).await {
        Ok(record) => record,
        Err(e) => {
            log_record_operation("fetch", &session.email, &record_id, false, None);
            return e.into_response();
        }
    };

    if let Err(e) = ensure_owned_by(&record, &session.name) {
        log_record_operation("update", &session.email, &record_id, false, Some("not owner"));
        return e.into_response();
    }

    match client.update_order(&record_id, &fields).await {
        Ok(updated) => {
            log_record_operation("update", &session.email, &record_id, true, None);
            Json(updated).into_response()
        }
        Err(e) => {
            log_record_operation("update", &session.email, &record_id, false, None);
            e.into_response()
        }
    }
}
