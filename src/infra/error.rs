//! Error types for gateway infrastructure

use thiserror::Error;

/// Errors surfaced by the gateway's persistence collaborators.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored credential could not be interpreted
    #[error("credential store error: {0}")]
    Credential(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for gateway infrastructure operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
