//! In-memory directory for development and tests
//!
//! Holds the same relationships the Postgres schema does and resolves the
//! ownership join chains over plain maps.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{ResourceKind, UserId};

use super::{OwnerDirectory, Result, UserAccount, UserDirectory};

/// In-memory user accounts and resource relationships.
#[derive(Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<String, UserAccount>>,
    /// publisher id -> owning user
    publishers: RwLock<HashMap<i64, UserId>>,
    /// advertiser id -> owning user
    advertisers: RwLock<HashMap<i64, UserId>>,
    /// site id -> publisher id
    sites: RwLock<HashMap<i64, i64>>,
    /// campaign id -> advertiser id
    campaigns: RwLock<HashMap<i64, i64>>,
    /// ad zone id -> site id
    ad_zones: RwLock<HashMap<i64, i64>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, account: UserAccount) {
        let mut users = self.users.write().unwrap();
        users.insert(account.username.clone(), account);
    }

    pub fn add_publisher(&self, id: i64, owner: UserId) {
        self.publishers.write().unwrap().insert(id, owner);
    }

    pub fn add_advertiser(&self, id: i64, owner: UserId) {
        self.advertisers.write().unwrap().insert(id, owner);
    }

    pub fn add_site(&self, id: i64, publisher_id: i64) {
        self.sites.write().unwrap().insert(id, publisher_id);
    }

    pub fn add_campaign(&self, id: i64, advertiser_id: i64) {
        self.campaigns.write().unwrap().insert(id, advertiser_id);
    }

    pub fn add_ad_zone(&self, id: i64, site_id: i64) {
        self.ad_zones.write().unwrap().insert(id, site_id);
    }
}

#[async_trait]
impl OwnerDirectory for InMemoryDirectory {
    async fn lookup_owner(&self, kind: ResourceKind, id: i64) -> Result<Option<UserId>> {
        let owner = match kind {
            ResourceKind::User => {
                let users = self.users.read().unwrap();
                users
                    .values()
                    .find(|account| account.id == UserId(id))
                    .map(|account| account.id)
            }
            ResourceKind::Publisher => self.publishers.read().unwrap().get(&id).copied(),
            ResourceKind::Advertiser => self.advertisers.read().unwrap().get(&id).copied(),
            ResourceKind::Campaign => {
                let advertiser = self.campaigns.read().unwrap().get(&id).copied();
                advertiser.and_then(|a| self.advertisers.read().unwrap().get(&a).copied())
            }
            ResourceKind::AdZone => {
                let site = self.ad_zones.read().unwrap().get(&id).copied();
                let publisher =
                    site.and_then(|s| self.sites.read().unwrap().get(&s).copied());
                publisher.and_then(|p| self.publishers.read().unwrap().get(&p).copied())
            }
        };
        Ok(owner)
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let users = self.users.read().unwrap();
        Ok(users.get(username).cloned())
    }
}
