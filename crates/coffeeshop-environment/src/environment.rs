//! The client environment record and its layered loading

use crate::absolute_url::AbsoluteUrl;
use crate::auth0::Auth0Settings;
use crate::error::{EnvironmentError, Result};
use coffeeshop_common::ConfigLoader;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::Uncased,
    Figment,
};
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize,
};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File read by [`Environment::load`] when no path is given
pub const DEFAULT_ENVIRONMENT_FILE: &str = "environment.toml";

/// Prefix of environment variables overriding the record
pub const ENV_PREFIX: &str = "COFFEESHOP_ENV_";

/// Environment-specific values of the Coffee Shop web client.
///
/// Built once at build/deploy time and never mutated afterwards: the fields
/// are private and there are no setters.
///
/// ```compile_fail,E0616
/// let mut env = coffeeshop_environment::Environment::development().unwrap();
/// env.production = true;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EnvironmentRecord", rename_all = "camelCase")]
pub struct Environment {
    production: bool,
    api_server_url: AbsoluteUrl,
    auth0: Auth0Settings,
}

impl Environment {
    /// Validate every field and the production policy
    pub fn new(production: bool, api_server_url: &str, auth0: Auth0Settings) -> Result<Self> {
        let api_server_url = AbsoluteUrl::parse("apiServerUrl", api_server_url)?;

        if production {
            ensure_public_https("apiServerUrl", &api_server_url)?;
            ensure_public_https("auth0.callbackURL", auth0.callback_url())?;
        }

        Ok(Self {
            production,
            api_server_url,
            auth0,
        })
    }

    /// Local development values: the API on port 5000 and the Ionic client
    /// on port 4200
    pub fn development() -> Result<Self> {
        Self::try_from(EnvironmentRecord::default())
    }

    pub fn production(&self) -> bool {
        self.production
    }

    pub fn api_server_url(&self) -> &AbsoluteUrl {
        &self.api_server_url
    }

    pub fn auth0(&self) -> &Auth0Settings {
        &self.auth0
    }

    /// Load from `path` (or `environment.toml`) layered over the development
    /// defaults, then `COFFEESHOP_ENV_*` variables
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let record = <EnvironmentRecord as ConfigLoader<EnvironmentRecord>>::load(path)?;
        Self::try_from(record)
    }

    /// Like [`Environment::load`] but the file must exist
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let record = <EnvironmentRecord as ConfigLoader<EnvironmentRecord>>::load_from_file(path)?;
        Self::try_from(record)
    }

    /// Serialized, unvalidated form
    pub fn to_record(&self) -> EnvironmentRecord {
        EnvironmentRecord {
            production: self.production,
            api_server_url: self.api_server_url.as_str().to_string(),
            auth0: Auth0Record {
                url: self.auth0.url().to_string(),
                audience: self.auth0.audience().to_string(),
                client_id: self.auth0.client_id().to_string(),
                callback_url: self.auth0.callback_url().as_str().to_string(),
            },
        }
    }
}

fn ensure_public_https(field: &'static str, url: &AbsoluteUrl) -> Result<()> {
    if url.is_https() && !url.is_loopback() {
        Ok(())
    } else {
        Err(EnvironmentError::InsecureProductionUrl {
            field,
            value: url.as_str().to_string(),
        })
    }
}

/// Wire shape of [`Environment`] before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentRecord {
    pub production: bool,
    #[serde(rename = "apiServerUrl", deserialize_with = "string_like")]
    pub api_server_url: String,
    pub auth0: Auth0Record,
}

/// Wire shape of [`Auth0Settings`] before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Auth0Record {
    #[serde(deserialize_with = "string_like")]
    pub url: String,
    #[serde(deserialize_with = "string_like")]
    pub audience: String,
    #[serde(rename = "clientId", deserialize_with = "string_like")]
    pub client_id: String,
    #[serde(rename = "callbackURL", deserialize_with = "string_like")]
    pub callback_url: String,
}

/// Read a string field that may arrive as another scalar.
///
/// Figment types environment values, so `COFFEESHOP_ENV_AUTH0__CLIENT_ID=12345`
/// reaches the record as a number. Floats lose their original spelling
/// (`1.50` becomes `1.5`).
fn string_like<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringLike;

    impl<'de> Visitor<'de> for StringLike {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(StringLike)
}

impl Default for EnvironmentRecord {
    fn default() -> Self {
        Self {
            production: false,
            api_server_url: "http://127.0.0.1:5000".to_string(),
            auth0: Auth0Record::default(),
        }
    }
}

impl Default for Auth0Record {
    fn default() -> Self {
        Self {
            url: "chad-fsnd".to_string(),
            audience: "drinks".to_string(),
            client_id: "yoT37hFe3ju78eiG4PsbIWz9rd7LeJBO".to_string(),
            callback_url: "http://localhost:4200".to_string(),
        }
    }
}

impl TryFrom<EnvironmentRecord> for Environment {
    type Error = EnvironmentError;

    fn try_from(record: EnvironmentRecord) -> Result<Self> {
        let auth0 = Auth0Settings::new(
            record.auth0.url,
            record.auth0.audience,
            record.auth0.client_id,
            &record.auth0.callback_url,
        )?;
        Environment::new(record.production, &record.api_server_url, auth0)
    }
}

impl ConfigLoader<EnvironmentRecord> for EnvironmentRecord {
    const DEFAULT_FILE: &'static str = DEFAULT_ENVIRONMENT_FILE;
    const ENV_PREFIX: &'static str = ENV_PREFIX;

    fn figment(path: &Path) -> Figment {
        debug!("Loading client environment from {}", path.display());
        Figment::from(Serialized::defaults(EnvironmentRecord::default()))
            .merge(Toml::file(path))
            .merge(env_provider())
    }
}

/// Environment variables arrive upper-cased (`COFFEESHOP_ENV_AUTH0__CLIENT_ID`);
/// map them onto the record's camelCase keys.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .split("__")
        .map(|key| Uncased::from(canonical_key(key.as_str())))
        .lowercase(false)
}

fn canonical_key(key: &str) -> String {
    key.split('.')
        .map(|segment| {
            let folded: String = segment
                .chars()
                .filter(|c| *c != '_')
                .flat_map(char::to_lowercase)
                .collect();
            match folded.as_str() {
                "apiserverurl" => "apiServerUrl".to_string(),
                "clientid" => "clientId".to_string(),
                "callbackurl" => "callbackURL".to_string(),
                _ => folded,
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_development_record_is_valid() {
        let env = Environment::try_from(EnvironmentRecord::default()).unwrap();
        assert_eq!(env, Environment::development().unwrap());
    }

    #[test]
    fn test_development_values() {
        let env = Environment::development().unwrap();
        assert!(!env.production());
        assert_eq!(env.api_server_url().as_str(), "http://127.0.0.1:5000");
        assert_eq!(env.auth0().url(), "chad-fsnd");
        assert_eq!(env.auth0().audience(), "drinks");
        assert_eq!(env.auth0().client_id(), "yoT37hFe3ju78eiG4PsbIWz9rd7LeJBO");
        assert_eq!(env.auth0().callback_url().as_str(), "http://localhost:4200");
    }

    #[test]
    fn test_production_requires_public_https() {
        let auth0 = Auth0Settings::new("shop", "drinks", "client", "https://shop.example.com").unwrap();
        let err = Environment::new(true, "http://api.example.com", auth0.clone()).unwrap_err();
        assert_eq!(
            err,
            EnvironmentError::InsecureProductionUrl {
                field: "apiServerUrl",
                value: "http://api.example.com".to_string()
            }
        );

        let local_callback =
            Auth0Settings::new("shop", "drinks", "client", "https://localhost:4200").unwrap();
        assert!(matches!(
            Environment::new(true, "https://api.example.com", local_callback),
            Err(EnvironmentError::InsecureProductionUrl {
                field: "auth0.callbackURL",
                ..
            })
        ));

        let env = Environment::new(true, "https://api.example.com", auth0).unwrap();
        assert!(env.production());
    }

    #[test]
    fn test_development_allows_loopback_http() {
        let auth0 = Auth0Settings::new("shop", "drinks", "client", "http://localhost:8100").unwrap();
        assert!(Environment::new(false, "http://127.0.0.1:5000", auth0).is_ok());
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(Environment::development().unwrap()).unwrap();
        let mut top: Vec<&String> = value.as_object().unwrap().keys().collect();
        top.sort();
        assert_eq!(top, vec!["apiServerUrl", "auth0", "production"]);

        let mut auth0: Vec<&String> = value["auth0"].as_object().unwrap().keys().collect();
        auth0.sort();
        assert_eq!(auth0, vec!["audience", "callbackURL", "clientId", "url"]);
        assert_eq!(value["production"], serde_json::Value::Bool(false));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{
            "production": false,
            "apiServerUrl": "not a url",
            "auth0": {
                "url": "chad-fsnd",
                "audience": "drinks",
                "clientId": "abc",
                "callbackURL": "http://localhost:4200"
            }
        }"#;
        assert!(serde_json::from_str::<Environment>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_unknown_and_missing_fields() {
        let extra = r#"{
            "production": false,
            "apiServerUrl": "http://127.0.0.1:5000",
            "debug": true,
            "auth0": {
                "url": "chad-fsnd",
                "audience": "drinks",
                "clientId": "abc",
                "callbackURL": "http://localhost:4200"
            }
        }"#;
        assert!(serde_json::from_str::<Environment>(extra).is_err());

        let missing = r#"{
            "production": false,
            "apiServerUrl": "http://127.0.0.1:5000",
            "auth0": { "url": "chad-fsnd", "audience": "drinks", "clientId": "abc" }
        }"#;
        assert!(serde_json::from_str::<Environment>(missing).is_err());
    }

    #[test]
    fn test_production_must_be_boolean() {
        let json = r#"{
            "production": "false",
            "apiServerUrl": "http://127.0.0.1:5000",
            "auth0": {
                "url": "chad-fsnd",
                "audience": "drinks",
                "clientId": "abc",
                "callbackURL": "http://localhost:4200"
            }
        }"#;
        assert!(serde_json::from_str::<Environment>(json).is_err());
    }

    #[test]
    fn test_scalar_values_are_read_as_strings() {
        let record: EnvironmentRecord = serde_json::from_str(
            r#"{
                "production": false,
                "apiServerUrl": "http://127.0.0.1:5000",
                "auth0": {
                    "url": "chad-fsnd",
                    "audience": true,
                    "clientId": 12345,
                    "callbackURL": "http://localhost:4200"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(record.auth0.client_id, "12345");
        assert_eq!(record.auth0.audience, "true");

        let nested: std::result::Result<EnvironmentRecord, _> = serde_json::from_str(
            r#"{
                "production": false,
                "apiServerUrl": ["http://127.0.0.1:5000"],
                "auth0": {
                    "url": "chad-fsnd",
                    "audience": "drinks",
                    "clientId": "abc",
                    "callbackURL": "http://localhost:4200"
                }
            }"#,
        );
        assert!(nested.is_err());
    }

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("PRODUCTION"), "production");
        assert_eq!(canonical_key("API_SERVER_URL"), "apiServerUrl");
        assert_eq!(canonical_key("AUTH0.CLIENT_ID"), "auth0.clientId");
        assert_eq!(canonical_key("auth0.callbackurl"), "auth0.callbackURL");
        assert_eq!(canonical_key("AUTH0.AUDIENCE"), "auth0.audience");
    }

    #[test]
    fn test_to_record_round_trip() {
        let env = Environment::development().unwrap();
        assert_eq!(Environment::try_from(env.to_record()).unwrap(), env);
    }
}
