//! AdNet Gateway Library
//!
//! Authentication and authorization gateway for a multi-tenant advertising
//! platform: signed session tokens, per-endpoint role restrictions, and
//! resource ownership resolution across the platform's join chains.
//!
//! ## Modules
//!
//! - [`domain`] - Core domain types (ids, roles, resource kinds)
//! - [`auth`] - Token codec/service, endpoint policy, gate, ownership
//! - [`infra`] - Persistence collaborators (PostgreSQL, in-memory)
//! - [`api`] - REST API routes
//! - [`server`] - HTTP server bootstrap

pub mod api;
pub mod auth;
pub mod domain;
pub mod infra;
pub mod migrations;
pub mod server;

// Re-export commonly used types
pub use auth::{
    AuthError, AuthorizationGate, Claims, Decision, OwnershipResolver, PolicyMode, PolicyTable,
    Subject, TokenService,
};
pub use domain::{ResourceKind, Role, UserId};
pub use infra::{
    GatewayError, InMemoryDirectory, OwnerDirectory, PgOwnerDirectory, PgUserDirectory, Result,
    UserAccount, UserDirectory,
};
