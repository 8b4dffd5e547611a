//! HTTP rendering of gateway failures
//!
//! Denials map onto the wire contract the platform's consumers rely on:
//! 401 `{"error":"Access token required"}` when no credential is supplied,
//! 401 `{"error":"Invalid or expired token"}` when validation fails, and
//! 403 `{"error":"Permission denied"}` for role and ownership refusals.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::auth::AuthError;
use crate::infra::GatewayError;

/// Error responses produced by the API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Authorization denial with its reason.
    Denied(AuthError),
    /// Login with an unknown username or a wrong password.
    InvalidCredentials,
    /// Infrastructure failure; details stay in the logs.
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Denied(err)
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Denied(AuthError::MissingToken) => {
                (StatusCode::UNAUTHORIZED, "Access token required")
            }
            ApiError::Denied(
                AuthError::Malformed
                | AuthError::InvalidSignature
                | AuthError::Expired
                | AuthError::MissingSubject,
            ) => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            ApiError::Denied(AuthError::InsufficientRole | AuthError::UnknownResourceType(_)) => {
                (StatusCode::FORBIDDEN, "Permission denied")
            }
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_denial_status_mapping() {
        assert_eq!(
            status_of(ApiError::Denied(AuthError::MissingToken)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::Denied(AuthError::Expired)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::Denied(AuthError::InsufficientRole)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(ApiError::Internal("db down".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
