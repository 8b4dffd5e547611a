//! REST API for the AdNet gateway

mod error;
mod rest;

pub use error::ApiError;
pub use rest::router;
