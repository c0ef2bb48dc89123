//! Sources of the tenant's signing keys

use super::jwt_validator::JwkSet;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Error)]
pub enum JwksError {
    #[error("Failed to fetch JWKS: {0}")]
    Fetch(String),

    #[error("JWKS endpoint returned error: {0}")]
    Status(u16),

    #[error("Failed to parse JWKS JSON: {0}")]
    Parse(String),

    #[error("JWKS contains no keys")]
    Empty,
}

/// Where token signing keys come from
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn jwks(&self) -> Result<Arc<JwkSet>, JwksError>;
}

/// Fetches the JWKS over HTTP and caches it for the configured TTL
pub struct RemoteKeySource {
    url: String,
    client: reqwest::Client,
    cache: Cache<String, Arc<JwkSet>>,
}

impl RemoteKeySource {
    pub fn new(url: impl Into<String>, cache_ttl: Duration) -> Result<Self, JwksError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("coffeeshop-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| JwksError::Fetch(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
            cache: Cache::builder()
                .time_to_live(cache_ttl)
                .max_capacity(1)
                .build(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[instrument(level = "debug", skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Arc<JwkSet>, JwksError> {
        debug!("Fetching JWKS");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| JwksError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| JwksError::Fetch(e.to_string()))?;
        let jwks: JwkSet =
            serde_json::from_str(&body).map_err(|e| JwksError::Parse(e.to_string()))?;

        if jwks.keys.is_empty() {
            return Err(JwksError::Empty);
        }

        debug!("Fetched JWKS with {} keys", jwks.keys.len());
        Ok(Arc::new(jwks))
    }
}

#[async_trait]
impl KeySource for RemoteKeySource {
    async fn jwks(&self) -> Result<Arc<JwkSet>, JwksError> {
        // concurrent misses share one fetch; failures are not cached
        self.cache
            .try_get_with(self.url.clone(), self.fetch())
            .await
            .map_err(|e| (*e).clone())
    }
}

/// A fixed key set
pub struct StaticKeySource {
    jwks: Arc<JwkSet>,
}

impl StaticKeySource {
    pub fn new(jwks: JwkSet) -> Self {
        Self {
            jwks: Arc::new(jwks),
        }
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn jwks(&self) -> Result<Arc<JwkSet>, JwksError> {
        Ok(self.jwks.clone())
    }
}
