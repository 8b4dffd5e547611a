//! Authentication and authorization for the AdNet gateway
//!
//! This module is the trust boundary for the platform's API: it issues and
//! verifies signed session tokens, enforces per-endpoint role restrictions,
//! and resolves resource ownership.
//!
//! # Components
//!
//! - [`codec`]: sign/verify of the compact three-part token format
//!   (HMAC-SHA256, URL-safe base64)
//! - [`TokenService`]: token issuance and validation with issuer and expiry
//! - [`PolicyTable`]: `(resource, method) -> role set` endpoint restrictions
//! - [`AuthorizationGate`]: bearer extraction, validation, and role check
//! - [`OwnershipResolver`]: join-chain ownership lookups with admin bypass
//!
//! # Configuration
//!
//! The signing secret and policy table are immutable after construction and
//! passed in explicitly, so tests can run isolated gateways with distinct
//! secrets. `AUTH_DEFAULT` selects what happens to endpoints the policy
//! table does not list (`allow` or `deny`).

pub mod codec;
mod gate;
mod ownership;
mod policy;
mod token;

pub use gate::{AuthorizationGate, Decision};
pub use ownership::{is_admin, OwnershipResolver};
pub use policy::{default_rules, PolicyMode, PolicyRules, PolicyTable};
pub use token::{Claims, TokenService};

use serde::{Deserialize, Serialize};

use crate::domain::{Role, UserId};

/// Authenticated identity embedded in a token's claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// User account id.
    pub id: UserId,

    /// Login name, echoed back to consumers for display.
    pub username: String,

    /// Account role.
    pub role: Role,
}

impl Subject {
    pub fn new(id: impl Into<UserId>, username: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            role,
        }
    }
}

/// Authentication and authorization failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Token does not parse into three segments, or claims are not well-formed.
    #[error("malformed token")]
    Malformed,

    /// Signature does not match the header and claims segments.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Claims expiry has passed.
    #[error("token expired")]
    Expired,

    /// Claims carry no embedded subject.
    #[error("token claims missing subject")]
    MissingSubject,

    /// No bearer credential was supplied.
    #[error("access token required")]
    MissingToken,

    /// Authenticated, but the role is not permitted for this endpoint.
    #[error("insufficient role")]
    InsufficientRole,

    /// Resource type outside the supported set.
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),
}
