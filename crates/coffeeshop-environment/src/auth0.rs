//! Auth0 settings of the client environment and the values derived from them

use crate::absolute_url::AbsoluteUrl;
use crate::error::{EnvironmentError, Result};
use serde::Serialize;
use url::Url;

/// Suffix appended to a bare tenant prefix such as `chad-fsnd`
pub const AUTH0_DOMAIN_SUFFIX: &str = "auth0.com";

/// Resolve the tenant domain from the configured `auth0.url`.
///
/// A bare prefix gets `.auth0.com` appended; anything containing a dot is
/// already a domain (regional tenants such as `tenant.us.auth0.com`).
pub fn tenant_domain(url: &str) -> String {
    if url.contains('.') {
        url.to_string()
    } else {
        format!("{url}.{AUTH0_DOMAIN_SUFFIX}")
    }
}

/// Issuer claim Auth0 puts in tokens for `domain`
pub fn issuer_for(domain: &str) -> String {
    format!("https://{domain}/")
}

/// JWKS endpoint for `domain`
pub fn jwks_url_for(domain: &str) -> String {
    format!("https://{domain}/.well-known/jwks.json")
}

/// Identity-provider group of the environment record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Auth0Settings {
    url: String,
    audience: String,
    #[serde(rename = "clientId")]
    client_id: String,
    #[serde(rename = "callbackURL")]
    callback_url: AbsoluteUrl,
}

impl Auth0Settings {
    /// Validate and build the identity-provider settings
    pub fn new(
        url: impl Into<String>,
        audience: impl Into<String>,
        client_id: impl Into<String>,
        callback_url: &str,
    ) -> Result<Self> {
        let url = url.into().trim().to_string();
        validate_tenant(&url)?;

        let audience = non_empty("auth0.audience", audience.into())?;
        let client_id = non_empty("auth0.clientId", client_id.into())?;
        let callback_url = AbsoluteUrl::parse("auth0.callbackURL", callback_url)?;

        Ok(Self {
            url,
            audience,
            client_id,
            callback_url,
        })
    }

    /// Tenant prefix or domain as configured
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn callback_url(&self) -> &AbsoluteUrl {
        &self.callback_url
    }

    /// Full tenant domain, e.g. `chad-fsnd.auth0.com`
    pub fn domain(&self) -> String {
        tenant_domain(&self.url)
    }

    /// Expected `iss` claim of tokens issued by this tenant
    pub fn issuer(&self) -> String {
        issuer_for(&self.domain())
    }

    pub fn jwks_url(&self) -> String {
        jwks_url_for(&self.domain())
    }

    /// Implicit-flow login link that returns the access token to
    /// `callbackURL` followed by `callback_path`
    pub fn login_link(&self, callback_path: &str) -> Result<Url> {
        let mut link = self.tenant_url("/authorize")?;
        link.query_pairs_mut()
            .append_pair("audience", &self.audience)
            .append_pair("response_type", "token")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri(callback_path));
        Ok(link)
    }

    /// Logout link that returns the browser to `callbackURL`
    pub fn logout_link(&self) -> Result<Url> {
        let mut link = self.tenant_url("/v2/logout")?;
        link.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("returnTo", self.callback_url.as_str());
        Ok(link)
    }

    fn redirect_uri(&self, callback_path: &str) -> String {
        let base = self.callback_url.as_str();
        if callback_path.starts_with('/') {
            format!("{}{}", base.trim_end_matches('/'), callback_path)
        } else {
            format!("{base}{callback_path}")
        }
    }

    fn tenant_url(&self, path: &str) -> Result<Url> {
        let raw = format!("https://{}{}", self.domain(), path);
        Url::parse(&raw).map_err(|e| EnvironmentError::InvalidUrl {
            field: "auth0.url",
            value: raw.clone(),
            reason: e.to_string(),
        })
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(EnvironmentError::EmptyField { field });
    }
    if value.chars().any(char::is_control) {
        return Err(EnvironmentError::InvalidValue {
            key: field.to_string(),
            value,
        });
    }
    Ok(value)
}

fn validate_tenant(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(EnvironmentError::EmptyField { field: "auth0.url" });
    }

    let valid_chars = url
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    let valid_edges = !url.starts_with(['.', '-']) && !url.ends_with(['.', '-']);

    if valid_chars && valid_edges && !url.contains("..") {
        Ok(())
    } else {
        Err(EnvironmentError::InvalidTenant {
            value: url.to_string(),
        })
    }
}
