//! Validated absolute URL that keeps its original spelling

use crate::error::{EnvironmentError, Result};
use serde::Serialize;
use std::fmt;
use url::{Host, Url};

/// An absolute `http`/`https` URL.
///
/// The text is kept exactly as configured: `http://localhost:4200` stays
/// without a trailing slash, because Auth0 compares callback URLs verbatim.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "String")]
pub struct AbsoluteUrl {
    raw: String,
    #[serde(skip)]
    parsed: Url,
}

impl AbsoluteUrl {
    /// Parse and validate `value`; `field` names the record field in errors
    pub fn parse(field: &'static str, value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(EnvironmentError::EmptyField { field });
        }

        // the url crate silently strips tabs and newlines; the raw text keeps them
        if value.chars().any(char::is_control) {
            return Err(EnvironmentError::InvalidValue {
                key: field.to_string(),
                value: value.to_string(),
            });
        }

        let parsed = Url::parse(value).map_err(|e| EnvironmentError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(EnvironmentError::UnsupportedScheme {
                    field,
                    scheme: other.to_string(),
                })
            }
        }

        if parsed.host().is_none() {
            return Err(EnvironmentError::InvalidUrl {
                field,
                value: value.to_string(),
                reason: "missing host".to_string(),
            });
        }

        Ok(Self {
            raw: value.to_string(),
            parsed,
        })
    }

    /// The URL as configured
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed form, for joining paths and building queries
    pub fn url(&self) -> &Url {
        &self.parsed
    }

    pub fn is_https(&self) -> bool {
        self.parsed.scheme() == "https"
    }

    /// Whether the host is `localhost`, a `127.0.0.0/8` address or `::1`
    pub fn is_loopback(&self) -> bool {
        match self.parsed.host() {
            Some(Host::Domain(domain)) => {
                domain.eq_ignore_ascii_case("localhost") || domain.ends_with(".localhost")
            }
            Some(Host::Ipv4(ip)) => ip.is_loopback(),
            Some(Host::Ipv6(ip)) => ip.is_loopback(),
            None => false,
        }
    }
}

impl PartialEq for AbsoluteUrl {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for AbsoluteUrl {}

impl fmt::Display for AbsoluteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<AbsoluteUrl> for String {
    fn from(url: AbsoluteUrl) -> Self {
        url.raw
    }
}

impl AsRef<str> for AbsoluteUrl {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
