//! Resource ownership resolution
//!
//! Decides whether a subject may act on a specific resource. Admins bypass
//! ownership entirely; everyone else must be the owning user, resolved by
//! following the resource's join chain through the owner directory:
//!
//! ```text
//! user       -> the subject itself
//! publisher  -> publishers.user_id
//! advertiser -> advertisers.user_id
//! campaign   -> campaigns.advertiser_id -> advertisers.user_id
//! ad_zone    -> ad_zones.site_id -> sites.publisher_id -> publishers.user_id
//! ```
//!
//! A missing resource resolves to "not owned": callers cannot distinguish
//! a resource that does not exist from one owned by someone else.

use std::sync::Arc;

use crate::domain::{ResourceKind, Role, UserId};
use crate::infra::{OwnerDirectory, Result};

use super::Subject;

/// True iff the subject holds the admin role.
pub fn is_admin(subject: &Subject) -> bool {
    subject.role == Role::Admin
}

/// Resolves resource ownership through the persistence collaborator.
///
/// Read-only and stateless; every decision completes within the request
/// that asked for it.
pub struct OwnershipResolver {
    directory: Arc<dyn OwnerDirectory>,
}

impl OwnershipResolver {
    pub fn new(directory: Arc<dyn OwnerDirectory>) -> Self {
        Self { directory }
    }

    /// Whether `subject` may act on the resource `(kind, id)`.
    pub async fn can_access(&self, subject: &Subject, kind: ResourceKind, id: i64) -> Result<bool> {
        if is_admin(subject) {
            return Ok(true);
        }

        let owner = match kind {
            ResourceKind::User => return Ok(subject.id == UserId(id)),
            ResourceKind::Publisher
            | ResourceKind::Advertiser
            | ResourceKind::Campaign
            | ResourceKind::AdZone => self.directory.lookup_owner(kind, id).await?,
        };

        Ok(owner == Some(subject.id))
    }

    /// String-typed entry point for callers that receive the resource name
    /// over the wire. Admins pass unconditionally; a name outside the
    /// supported set denies everyone else.
    pub async fn can_access_named(&self, subject: &Subject, kind: &str, id: i64) -> Result<bool> {
        if is_admin(subject) {
            return Ok(true);
        }
        match ResourceKind::parse(kind) {
            Some(kind) => self.can_access(subject, kind, id).await,
            None => Ok(false),
        }
    }
}
