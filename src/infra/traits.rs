//! Trait definitions for the gateway's persistence collaborators

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{ResourceKind, Role, UserId};

use super::Result;

/// A user account row as the gateway needs it.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    /// PHC-format argon2 hash; plaintext passwords are never stored.
    pub password_hash: String,
    pub role: Role,
}

/// Resolves the owning user of a resource by following its join chain.
///
/// Invariant: every resource maps to exactly one owning user, or it does
/// not exist. `None` is a normal outcome, not an error.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OwnerDirectory: Send + Sync {
    /// Owning user id for `(kind, id)`, or `None` when the resource is
    /// absent.
    async fn lookup_owner(&self, kind: ResourceKind, id: i64) -> Result<Option<UserId>>;
}

/// Looks up accounts at login.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>>;
}
