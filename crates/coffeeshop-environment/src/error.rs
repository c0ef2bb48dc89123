//! Error types for the client environment record

use thiserror::Error;

/// Everything that can go wrong building, loading or decoding an [`crate::Environment`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} is not a valid absolute URL ({value}): {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} must use http or https, got {scheme}")]
    UnsupportedScheme { field: &'static str, scheme: String },

    #[error("auth0.url must be a tenant prefix or domain, got {value:?}")]
    InvalidTenant { value: String },

    #[error("{field} must be a public https URL in production, got {value}")]
    InsecureProductionUrl { field: &'static str, value: String },

    #[error("Missing key: {key}")]
    MissingKey { key: String },

    #[error("Unknown key: {key}")]
    UnknownKey { key: String },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Malformed line, expected key=value: {line:?}")]
    MalformedLine { line: String },

    #[error("Failed to load environment: {0}")]
    Load(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<coffeeshop_common::ConfigurationError> for EnvironmentError {
    fn from(err: coffeeshop_common::ConfigurationError) -> Self {
        EnvironmentError::Load(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EnvironmentError>;
