//! Authentication configuration

use coffeeshop_environment::{auth0, Environment};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Auth0 tenant and API the drinks service accepts tokens for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Auth0 tenant prefix (`chad-fsnd`) or full tenant domain
    pub tenant: String,

    /// API identifier tokens must be issued for
    pub audience: String,

    /// JWKS cache TTL in seconds
    pub jwks_cache_ttl: u64,

    /// Allowed clock skew for `exp`/`nbf` in seconds
    pub allowed_clock_skew: u64,

    /// Overrides the JWKS endpoint derived from the tenant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwks_url: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            tenant: "chad-fsnd".to_string(),
            audience: "drinks".to_string(),
            jwks_cache_ttl: 3600,
            allowed_clock_skew: 60,
            jwks_url: None,
        }
    }
}

impl AuthConfig {
    /// Use the tenant and audience the web client is configured with
    pub fn from_environment(env: &Environment) -> Self {
        Self {
            tenant: env.auth0().url().to_string(),
            audience: env.auth0().audience().to_string(),
            ..Self::default()
        }
    }

    pub fn domain(&self) -> String {
        auth0::tenant_domain(&self.tenant)
    }

    pub fn issuer(&self) -> String {
        auth0::issuer_for(&self.domain())
    }

    pub fn jwks_url(&self) -> String {
        self.jwks_url
            .clone()
            .unwrap_or_else(|| auth0::jwks_url_for(&self.domain()))
    }

    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl)
    }

    pub fn allowed_clock_skew(&self) -> Duration {
        Duration::from_secs(self.allowed_clock_skew)
    }
}
