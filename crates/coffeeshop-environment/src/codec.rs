//! Encodings of the environment record: JSON, TOML, a flat key-value map
//! and the TypeScript module the web client imports.

use crate::environment::{Auth0Record, Environment, EnvironmentRecord};
use crate::error::{EnvironmentError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Keys of the flat key-value form, in record order
pub const KEYS: [&str; 6] = [
    "production",
    "apiServerUrl",
    "auth0.url",
    "auth0.audience",
    "auth0.clientId",
    "auth0.callbackURL",
];

impl Environment {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| EnvironmentError::Serialization(e.to_string()))
    }

    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| EnvironmentError::Serialization(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EnvironmentError::Serialization(e.to_string()))
    }

    pub fn from_toml(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| EnvironmentError::Serialization(e.to_string()))
    }

    /// Flatten into `KEYS` -> value
    pub fn to_key_values(&self) -> BTreeMap<String, String> {
        let record = self.to_record();
        [
            ("production", record.production.to_string()),
            ("apiServerUrl", record.api_server_url),
            ("auth0.url", record.auth0.url),
            ("auth0.audience", record.auth0.audience),
            ("auth0.clientId", record.auth0.client_id),
            ("auth0.callbackURL", record.auth0.callback_url),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    /// Rebuild from a flat map holding exactly the six `KEYS`
    pub fn from_key_values(map: &BTreeMap<String, String>) -> Result<Self> {
        if let Some(unknown) = map.keys().find(|k| !KEYS.contains(&k.as_str())) {
            return Err(EnvironmentError::UnknownKey {
                key: unknown.clone(),
            });
        }

        let get = |key: &str| {
            map.get(key).cloned().ok_or_else(|| EnvironmentError::MissingKey {
                key: key.to_string(),
            })
        };

        let production_raw = get("production")?;
        let production = match production_raw.as_str() {
            "true" => true,
            "false" => false,
            _ => {
                return Err(EnvironmentError::InvalidValue {
                    key: "production".to_string(),
                    value: production_raw,
                })
            }
        };

        Environment::try_from(EnvironmentRecord {
            production,
            api_server_url: get("apiServerUrl")?,
            auth0: Auth0Record {
                url: get("auth0.url")?,
                audience: get("auth0.audience")?,
                client_id: get("auth0.clientId")?,
                callback_url: get("auth0.callbackURL")?,
            },
        })
    }

    /// One value of the flat form
    pub fn get(&self, key: &str) -> Result<String> {
        self.to_key_values()
            .remove(key)
            .ok_or_else(|| EnvironmentError::UnknownKey {
                key: key.to_string(),
            })
    }

    /// `key=value` lines in `KEYS` order
    pub fn render_properties(&self) -> String {
        let map = self.to_key_values();
        KEYS.iter()
            .filter_map(|key| map.get(*key).map(|value| format!("{key}={value}\n")))
            .collect()
    }

    /// Parse `key=value` lines; blank lines and `#` comments are skipped
    pub fn parse_properties(input: &str) -> Result<Self> {
        let mut map = BTreeMap::new();
        for line in input.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (key, value) = trimmed
                .split_once('=')
                .ok_or_else(|| EnvironmentError::MalformedLine {
                    line: line.to_string(),
                })?;
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
        Self::from_key_values(&map)
    }

    /// The `environment.ts` module consumed by the web client
    pub fn render_typescript(&self) -> Result<String> {
        let body = TypescriptLiteral::render(self)?;
        Ok(format!("export const environment = {body};\n"))
    }
}

/// Pretty-prints a serde value as a JavaScript object literal: bare keys,
/// single-quoted strings, two-space indentation.
struct TypescriptLiteral;

impl TypescriptLiteral {
    fn render<T: Serialize>(value: &T) -> Result<String> {
        let value = serde_json::to_value(value)
            .map_err(|e| EnvironmentError::Serialization(e.to_string()))?;
        let mut out = String::new();
        Self::write(&value, 0, &mut out);
        Ok(out)
    }

    fn write(value: &serde_json::Value, depth: usize, out: &mut String) {
        use serde_json::Value;

        match value {
            Value::Object(map) => {
                out.push_str("{\n");
                // record field order, not alphabetical
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by_key(|(k, _)| field_rank(k));
                let last = entries.len().saturating_sub(1);
                for (i, (key, inner)) in entries.into_iter().enumerate() {
                    out.push_str(&"  ".repeat(depth + 1));
                    out.push_str(key);
                    out.push_str(": ");
                    Self::write(inner, depth + 1, out);
                    if i != last {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&"  ".repeat(depth));
                out.push('}');
            }
            Value::String(s) => {
                out.push('\'');
                for c in s.chars() {
                    match c {
                        '\'' => out.push_str("\\'"),
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        other => out.push(other),
                    }
                }
                out.push('\'');
            }
            other => out.push_str(&other.to_string()),
        }
    }
}

fn field_rank(key: &str) -> usize {
    const ORDER: [&str; 7] = [
        "production",
        "apiServerUrl",
        "auth0",
        "url",
        "audience",
        "clientId",
        "callbackURL",
    ];
    ORDER.iter().position(|k| *k == key).unwrap_or(ORDER.len())
}
