//! HTTP server configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind_address: SocketAddr,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Origins allowed by CORS; empty allows any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 5000)),
            request_timeout: 30,
            cors_allowed_origins: Vec::new(),
        }
    }
}
