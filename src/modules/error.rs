use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use log::{error, warn};
use thiserror::Error;

/// Error taxonomy for the portal core.
///
/// Clients only ever see a generic status and label; the detail carried by
/// the variants is logged server-side.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Missing or unusable configuration. Fatal for the request, never for
    /// the process.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unknown email or wrong password. Indistinguishable to the caller.
    #[error("invalid email or password")]
    AuthenticationFailure,

    /// Bad signature, malformed structure, or wrong part count.
    #[error("session token is invalid")]
    TokenInvalid,

    /// Valid signature, past expiry. Same external treatment as TokenInvalid.
    #[error("session token has expired")]
    TokenExpired,

    /// Valid session, but the record belongs to a different identity.
    #[error("record is not owned by the authenticated user")]
    AuthorizationDenied,

    /// The remote record store was unreachable or returned an error.
    #[error("record store request failed: {0}")]
    Collaborator(String),

    /// The remote record store did not answer within the request timeout.
    #[error("record store request timed out")]
    CollaboratorTimeout,
}

impl PortalError {
    /// HTTP status this error maps to on API routes.
    pub fn status_code(&self) -> StatusCode {
        match self {
            PortalError::AuthenticationFailure
            | PortalError::TokenInvalid
            | PortalError::TokenExpired => StatusCode::UNAUTHORIZED,
            PortalError::AuthorizationDenied => StatusCode::FORBIDDEN,
            PortalError::Configuration(_)
            | PortalError::Collaborator(_)
            | PortalError::CollaboratorTimeout => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        // Log the detail here, at the boundary; the client body stays generic.
        match &self {
            PortalError::Configuration(detail) => error!("Configuration error: {}", detail),
            PortalError::Collaborator(detail) => error!("Record store failure: {}", detail),
            PortalError::CollaboratorTimeout => error!("Record store request timed out"),
            PortalError::AuthorizationDenied => {
                warn!("Refused mutation of a record owned by another identity")
            }
            _ => {}
        }

        let status = self.status_code();
        let message = match status {
            StatusCode::UNAUTHORIZED => "unauthorized",
            StatusCode::FORBIDDEN => "forbidden",
            _ => "internal server error",
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            PortalError::AuthenticationFailure.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            PortalError::TokenInvalid.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            PortalError::TokenExpired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            PortalError::AuthorizationDenied.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            PortalError::Configuration("missing".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            PortalError::Collaborator("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            PortalError::CollaboratorTimeout.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_client_body_never_carries_detail() {
        let response =
            PortalError::Collaborator("token=sk-secret leaked here".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("sk-secret"));
        assert!(body.contains("internal server error"));
    }
}
