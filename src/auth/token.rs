//! Session token issuance and validation
//!
//! Tokens embed the authenticated subject alongside issue time, expiry, and
//! the issuing server's identity. They are immutable once issued; there is
//! no refresh or revocation, a token simply expires.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{codec, AuthError, Subject};

/// Claims payload carried by every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issued-at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp). Always `iat` + the configured
    /// lifetime.
    pub exp: i64,

    /// Issuer identity string.
    pub iss: String,

    /// Embedded subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Subject>,
}

/// Issues and validates session tokens with a fixed secret and lifetime.
pub struct TokenService {
    secret: Vec<u8>,
    issuer: String,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], issuer: &str, lifetime: Duration) -> Self {
        Self {
            secret: secret.to_vec(),
            issuer: issuer.to_string(),
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for an authenticated subject.
    pub fn issue(&self, subject: Subject) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
            iss: self.issuer.clone(),
            data: Some(subject),
        };
        codec::encode(&claims, &self.secret)
    }

    /// Validate a token and return the embedded subject.
    ///
    /// Rejections carry the first failure encountered: signature problems
    /// before expiry, expiry before a missing subject.
    pub fn validate(&self, token: &str) -> Result<Subject, AuthError> {
        let claims: Claims = codec::verify(token, &self.secret)?;

        if claims.exp < Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }

        claims.data.ok_or(AuthError::MissingSubject)
    }
}
