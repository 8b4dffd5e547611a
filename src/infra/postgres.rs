//! PostgreSQL-backed directories
//!
//! One query per resource type; the campaign and ad zone lookups carry the
//! joins that walk from the resource to its owning user account.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{ResourceKind, Role, UserId};

use super::{GatewayError, OwnerDirectory, Result, UserAccount, UserDirectory};

/// Owner lookups against the platform schema.
pub struct PgOwnerDirectory {
    pool: PgPool,
}

impl PgOwnerDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnerDirectory for PgOwnerDirectory {
    async fn lookup_owner(&self, kind: ResourceKind, id: i64) -> Result<Option<UserId>> {
        let query = match kind {
            ResourceKind::User => "SELECT id FROM users WHERE id = $1",
            ResourceKind::Publisher => "SELECT user_id FROM publishers WHERE id = $1",
            ResourceKind::Advertiser => "SELECT user_id FROM advertisers WHERE id = $1",
            ResourceKind::Campaign => {
                "SELECT a.user_id FROM campaigns c \
                 JOIN advertisers a ON a.id = c.advertiser_id \
                 WHERE c.id = $1"
            }
            ResourceKind::AdZone => {
                "SELECT p.user_id FROM ad_zones z \
                 JOIN sites s ON s.id = z.site_id \
                 JOIN publishers p ON p.id = s.publisher_id \
                 WHERE z.id = $1"
            }
        };

        let owner: Option<i64> = sqlx::query_scalar(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner.map(UserId))
    }
}

/// Account lookups against the `users` table.
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let row: Option<(i64, String, String, String)> = sqlx::query_as(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id, username, password_hash, role)| {
            let role = Role::parse(&role).ok_or_else(|| {
                GatewayError::Credential(format!("unknown role {role:?} for user {id}"))
            })?;
            Ok(UserAccount {
                id: UserId(id),
                username,
                password_hash,
                role,
            })
        })
        .transpose()
    }
}
