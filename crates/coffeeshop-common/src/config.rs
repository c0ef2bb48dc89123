//! Figment-backed configuration loading shared by Coffee Shop binaries
//!
//! Every service layers its configuration the same way: serialized defaults,
//! then a TOML file, then prefixed environment variables where `__` separates
//! nested keys (`COFFEESHOP_API_SERVER__BIND_ADDRESS`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to parse configuration: {details}")]
    ParseError { details: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },
}

impl From<figment::Error> for ConfigurationError {
    fn from(err: figment::Error) -> Self {
        ConfigurationError::ParseError {
            details: err.to_string(),
        }
    }
}

/// Layered configuration loading.
///
/// Implementors only name their default file and environment prefix; the
/// provided methods do the merging.
pub trait ConfigLoader<T>: Sized
where
    T: Serialize + DeserializeOwned + Default,
{
    /// File read when no explicit path is given
    const DEFAULT_FILE: &'static str;

    /// Environment variable prefix, including the trailing underscore
    const ENV_PREFIX: &'static str;

    /// Load from `path`, or from [`Self::DEFAULT_FILE`] when it is `None`.
    /// A missing default file is not an error.
    fn load(path: Option<PathBuf>) -> Result<T, ConfigurationError> {
        let path = path.unwrap_or_else(|| PathBuf::from(Self::DEFAULT_FILE));
        Self::figment(&path).extract().map_err(Into::into)
    }

    /// Load from an explicit file, which must exist
    fn load_from_file(path: &Path) -> Result<T, ConfigurationError> {
        if !path.exists() {
            return Err(ConfigurationError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::figment(path).extract().map_err(Into::into)
    }

    /// The provider stack used by [`Self::load`] and [`Self::load_from_file`]
    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(T::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
    }
}

/// Render a configuration value as pretty TOML, for `--gen-config` style output
pub fn to_pretty_toml<T: Serialize>(config: &T) -> Result<String, ConfigurationError> {
    toml::to_string_pretty(config).map_err(|e| ConfigurationError::ParseError {
        details: format!("Failed to serialize config: {e}"),
    })
}
