//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::Argon2;
use chrono::Duration;

use adnet_gateway::auth::{AuthorizationGate, OwnershipResolver, PolicyMode, PolicyTable, TokenService};
use adnet_gateway::domain::{Role, UserId};
use adnet_gateway::infra::{InMemoryDirectory, UserAccount};
use adnet_gateway::server::AppState;
use adnet_gateway::Subject;

/// Signing secret shared by every fixture gateway.
pub const SECRET: &[u8] = b"integration-test-secret";

/// Password every fixture account logs in with.
pub const PASSWORD: &str = "hunter2!";

pub fn hash_password(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

/// Policy used across the integration tests.
pub fn test_policy(mode: PolicyMode) -> PolicyTable {
    PolicyTable::new(mode)
        .permit("user", "GET", [Role::Admin])
        .permit("campaign", "DELETE", [Role::Admin])
        .permit("campaign", "PUT", [Role::Admin, Role::Advertiser])
        .permit("ad_zone", "PUT", [Role::Admin, Role::Publisher])
        // Listed endpoint whose resource the ownership resolver does not
        // recognize.
        .permit("widget", "DELETE", [Role::Admin, Role::Publisher])
}

/// Directory with two publisher accounts, one advertiser, and one admin.
///
/// alice (user 1) owns publisher 10 -> site 20 -> ad zone 30.
/// bob (user 2) owns publisher 11.
/// carol (user 3) owns advertiser 40 -> campaign 50.
/// root (user 99) is the admin.
pub fn test_directory() -> Arc<InMemoryDirectory> {
    let dir = InMemoryDirectory::new();

    for (id, username, role) in [
        (1, "alice", Role::Publisher),
        (2, "bob", Role::Publisher),
        (3, "carol", Role::Advertiser),
        (99, "root", Role::Admin),
    ] {
        dir.add_user(UserAccount {
            id: UserId(id),
            username: username.to_string(),
            password_hash: hash_password(PASSWORD),
            role,
        });
    }

    dir.add_publisher(10, UserId(1));
    dir.add_site(20, 10);
    dir.add_ad_zone(30, 20);
    dir.add_publisher(11, UserId(2));
    dir.add_advertiser(40, UserId(3));
    dir.add_campaign(50, 40);

    Arc::new(dir)
}

/// Full application state over in-memory directories.
pub fn test_state(mode: PolicyMode) -> AppState {
    let directory = test_directory();
    let tokens = TokenService::new(SECRET, "adnet-gateway", Duration::hours(1));
    let gate = Arc::new(AuthorizationGate::new(tokens, test_policy(mode)));

    AppState {
        gate,
        resolver: Arc::new(OwnershipResolver::new(directory.clone())),
        users: directory.clone(),
        owners: directory,
    }
}

/// Issue a token for a fixture subject directly, bypassing login.
pub fn issue_token(state: &AppState, id: i64, username: &str, role: Role) -> String {
    state
        .gate
        .tokens()
        .issue(Subject::new(id, username, role))
        .unwrap()
}
