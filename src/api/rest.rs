//! REST endpoints for the AdNet gateway
//!
//! The gateway's consumers (dashboard, reporting) authenticate here and ask
//! for authorization decisions; they never see the signing secret or the
//! policy table directly.

use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::{codec, is_admin, AuthError, Claims, Subject};
use crate::domain::ResourceKind;
use crate::server::AppState;

use super::error::ApiError;

/// Build the `/v1` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/me", get(me))
        .route("/v1/access/check", post(check_access))
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    expires_at: i64,
    subject: Subject,
}

/// Verify credentials and issue a session token.
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let account = state
        .users
        .find_by_username(&request.username)
        .await?
        .filter(|account| verify_password(&request.password, &account.password_hash))
        .ok_or(ApiError::InvalidCredentials)?;

    let subject = Subject::new(account.id, account.username, account.role);
    let token = state.gate.tokens().issue(subject.clone())?;
    let claims: Claims = codec::decode(&token)?;

    tracing::info!(user = %subject.id, role = %subject.role, "login succeeded");

    Ok(Json(LoginResponse {
        token,
        expires_at: claims.exp,
        subject,
    }))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Validate the presented token and echo the embedded subject.
async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Subject>, ApiError> {
    let token = bearer(&headers).ok_or(AuthError::MissingToken)?;
    let subject = state.gate.tokens().validate(token)?;
    Ok(Json(subject))
}

// ============================================================================
// Authorization decisions
// ============================================================================

#[derive(Debug, Deserialize)]
struct CheckRequest {
    /// Logical resource name, e.g. `campaign`.
    resource: String,
    /// HTTP method of the operation being attempted.
    method: String,
    /// Target resource id for ownership-scoped operations.
    #[serde(default)]
    resource_id: Option<i64>,
}

#[derive(Debug, Serialize)]
struct CheckResponse {
    allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<Subject>,
}

/// Run the authorization pipeline for a consumer-described operation.
///
/// The role check always runs; the ownership check runs when the request
/// names a concrete resource id and a subject was authenticated.
async fn check_access(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, ApiError> {
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    let decision = state
        .gate
        .authorize(&request.resource, &request.method, authorization)?;

    if let (Some(subject), Some(id)) = (decision.subject(), request.resource_id) {
        let owned = match ResourceKind::parse(&request.resource) {
            Some(kind) => state.resolver.can_access(subject, kind, id).await?,
            // Admins bypass ownership unconditionally, even for names the
            // gateway does not recognize.
            None if is_admin(subject) => true,
            None => {
                return Err(AuthError::UnknownResourceType(request.resource.clone()).into());
            }
        };
        if !owned {
            tracing::debug!(
                user = %subject.id,
                resource = %request.resource,
                id,
                "ownership check refused"
            );
            return Err(AuthError::InsufficientRole.into());
        }
    }

    Ok(Json(CheckResponse {
        allowed: true,
        subject: decision.subject().cloned(),
    }))
}
