//! Configuration module for the Coffee Shop drinks API

mod auth;
mod server;

pub use auth::AuthConfig;
pub use server::ServerConfig;

use coffeeshop_common::config::{to_pretty_toml, ConfigLoader};
use coffeeshop_common::ConfigurationError as ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite:database.db" or "sqlite::memory:")
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Drop and recreate the drink table on startup, seeding one drink
    pub reset_on_startup: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:database.db".to_string(),
            max_connections: 5,
            reset_on_startup: false,
        }
    }
}

/// Main configuration structure for the drinks API
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Auth0 configuration
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) => <Config as ConfigLoader<Config>>::load_from_file(path)?,
            None => <Config as ConfigLoader<Config>>::load(None)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Generate example configuration file
    pub fn generate_example() -> Result<String, ConfigError> {
        to_pretty_toml(&Self::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.tenant.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "auth.tenant".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.auth.audience.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "auth.audience".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "database.max_connections".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout)
    }
}

impl ConfigLoader<Config> for Config {
    const DEFAULT_FILE: &'static str = "coffeeshop-api.toml";
    const ENV_PREFIX: &'static str = "COFFEESHOP_API_";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind_address.port(), 5000);
        assert_eq!(config.database.url, "sqlite:database.db");
        assert_eq!(config.auth.tenant, "chad-fsnd");
        assert_eq!(config.auth.audience, "drinks");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(
            deserialized.server.bind_address,
            config.server.bind_address
        );
        assert_eq!(deserialized.auth.jwks_cache_ttl, 3600);
    }

    #[test]
    fn test_generate_example_has_sections() {
        let example = Config::generate_example().unwrap();
        assert!(example.contains("[server]"));
        assert!(example.contains("[database]"));
        assert!(example.contains("[auth]"));
    }

    #[test]
    fn test_validate_rejects_empty_audience() {
        let mut config = Config::default();
        config.auth.audience = " ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "auth.audience"
        ));
    }

    #[test]
    #[serial]
    fn test_load_from_file_with_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
bind_address = "0.0.0.0:8080"

[auth]
tenant = "coffee-shop"
"#
        )
        .unwrap();

        std::env::set_var("COFFEESHOP_API_AUTH__AUDIENCE", "menu");
        let result = Config::load(Some(file.path()));
        std::env::remove_var("COFFEESHOP_API_AUTH__AUDIENCE");

        let config = result.unwrap();
        assert_eq!(config.server.bind_address.port(), 8080);
        assert_eq!(config.auth.tenant, "coffee-shop");
        assert_eq!(config.auth.audience, "menu");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = Config::load(Some(Path::new("/nonexistent/coffeeshop-api.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }
}
