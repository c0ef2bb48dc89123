//! Coffee Shop drinks API
//!
//! Serves the drinks menu to the web client and lets baristas and managers
//! change it. Write access is granted through Auth0 RBAC permissions.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod storage;

pub use error::{ApiError, Result};

/// Crate version reported by `/health`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
