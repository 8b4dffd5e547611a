//! Core type definitions for the AdNet gateway.
//!
//! Identifiers, the account role set, and the closed set of resource types
//! subject to ownership checks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        UserId(id)
    }
}

/// Account role. The wire format is lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform operator; bypasses ownership checks.
    Admin,
    /// Owns sites and the ad zones placed on them.
    Publisher,
    /// Owns campaigns.
    Advertiser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Publisher => "publisher",
            Role::Advertiser => "advertiser",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "publisher" => Some(Role::Publisher),
            "advertiser" => Some(Role::Advertiser),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource types whose ownership the gateway can resolve.
///
/// Closed set: a new resource type is a new variant, and every dispatch
/// site must then handle it. Strings outside the set fail to parse and are
/// denied by the callers that receive them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    User,
    Publisher,
    Advertiser,
    Campaign,
    AdZone,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::Publisher => "publisher",
            ResourceKind::Advertiser => "advertiser",
            ResourceKind::Campaign => "campaign",
            ResourceKind::AdZone => "ad_zone",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(ResourceKind::User),
            "publisher" => Some(ResourceKind::Publisher),
            "advertiser" => Some(ResourceKind::Advertiser),
            "campaign" => Some(ResourceKind::Campaign),
            "ad_zone" => Some(ResourceKind::AdZone),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
