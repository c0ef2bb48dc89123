//! JWT validation for Auth0 access tokens
//!
//! Tokens are RS256-signed by the tenant. The signing key is picked from the
//! tenant JWKS by the `kid` header; audience, issuer and expiry are checked
//! with the configured clock skew, then the RBAC `permissions` claim is
//! consulted for authorization.

use super::{AuthError, Permission};
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// JSON Web Key Set structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// JSON Web Key structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: Option<String>,
    pub alg: Option<String>,
    pub r#use: Option<String>,
    pub n: Option<String>,
    pub e: Option<String>,
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

impl JwkSet {
    /// RSA key with the given key ID
    pub fn find_rsa(&self, kid: &str) -> Option<&Jwk> {
        self.keys
            .iter()
            .find(|k| k.kty == "RSA" && k.kid.as_deref() == Some(kid))
    }
}

/// Claims of an Auth0 access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,
    /// Audience, a string or an array of strings
    pub aud: Value,
    /// Issuer, `https://{tenant domain}/`
    pub iss: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: Option<u64>,
    /// Token scope
    #[serde(default)]
    pub scope: Option<String>,
    /// RBAC permissions, present when RBAC is enabled for the API
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    /// Custom claims
    #[serde(flatten)]
    pub custom: HashMap<String, Value>,
}

/// What a token must be issued for
#[derive(Debug, Clone)]
pub struct TokenExpectations {
    pub audience: String,
    pub issuer: String,
    pub clock_skew: Duration,
}

/// Verify `token` against `jwks` and the expected audience and issuer
#[instrument(level = "debug", skip(token, jwks))]
pub fn validate_token(
    token: &str,
    jwks: &JwkSet,
    expected: &TokenExpectations,
) -> Result<Claims, AuthError> {
    let header = decode_header(token).map_err(|e| {
        debug!("Failed to decode JWT header: {}", e);
        AuthError::Unparseable
    })?;

    let kid = header.kid.ok_or_else(|| {
        debug!("JWT header missing key ID (kid)");
        AuthError::KeyNotFound
    })?;

    let jwk = jwks.find_rsa(&kid).ok_or_else(|| {
        warn!("No matching key found for key ID: {}", kid);
        AuthError::KeyNotFound
    })?;

    let decoding_key = rsa_decoding_key(jwk)?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[expected.audience.as_str()]);
    validation.set_issuer(&[expected.issuer.as_str()]);
    validation.set_required_spec_claims(&["exp", "aud", "iss"]);
    validation.leeway = expected.clock_skew.as_secs();

    let data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::InvalidClaims,
        ErrorKind::MissingRequiredClaim(claim) if claim == "aud" || claim == "iss" => {
            AuthError::InvalidClaims
        }
        other => {
            debug!("JWT validation failed: {:?}", other);
            AuthError::Unparseable
        }
    })?;

    debug!("JWT validated for subject {}", data.claims.sub);
    Ok(data.claims)
}

fn rsa_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
        warn!("RSA key {:?} is missing its modulus or exponent", jwk.kid);
        return Err(AuthError::KeyNotFound);
    };
    DecodingKey::from_rsa_components(n, e).map_err(|err| {
        warn!("Invalid RSA components for key {:?}: {}", jwk.kid, err);
        AuthError::Unparseable
    })
}

/// The `permissions` claim must exist and contain `required`
pub fn check_permission(claims: &Claims, required: Permission) -> Result<(), AuthError> {
    let permissions = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::PermissionsMissing)?;

    if permissions.iter().any(|p| p == required.as_str()) {
        Ok(())
    } else {
        debug!("Subject {} lacks permission {}", claims.sub, required);
        Err(AuthError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(permissions: Option<Vec<&str>>) -> Claims {
        Claims {
            sub: "auth0|barista".to_string(),
            aud: json!("drinks"),
            iss: "https://chad-fsnd.auth0.com/".to_string(),
            exp: 0,
            iat: None,
            scope: None,
            permissions: permissions.map(|p| p.into_iter().map(String::from).collect()),
            custom: HashMap::new(),
        }
    }

    fn expectations() -> TokenExpectations {
        TokenExpectations {
            audience: "drinks".to_string(),
            issuer: "https://chad-fsnd.auth0.com/".to_string(),
            clock_skew: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_check_permission() {
        let barista = claims(Some(vec!["get:drinks-detail"]));
        assert!(check_permission(&barista, Permission::GetDrinksDetail).is_ok());
        assert_eq!(
            check_permission(&barista, Permission::PostDrinks),
            Err(AuthError::PermissionDenied)
        );
        assert_eq!(
            check_permission(&claims(None), Permission::GetDrinksDetail),
            Err(AuthError::PermissionsMissing)
        );
    }

    #[test]
    fn test_garbage_token_is_unparseable() {
        let jwks = JwkSet { keys: vec![] };
        assert_eq!(
            validate_token("not-a-jwt", &jwks, &expectations()).unwrap_err(),
            AuthError::Unparseable
        );
    }

    #[test]
    fn test_unknown_kid() {
        // {"alg":"RS256","typ":"JWT","kid":"other"} . {} . signature
        let token = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCIsImtpZCI6Im90aGVyIn0.e30.c2ln";
        let jwks = JwkSet { keys: vec![] };
        assert_eq!(
            validate_token(token, &jwks, &expectations()).unwrap_err(),
            AuthError::KeyNotFound
        );
    }

    #[test]
    fn test_find_rsa_ignores_other_key_types() {
        let jwks: JwkSet = serde_json::from_value(json!({
            "keys": [
                {"kty": "EC", "kid": "k1", "crv": "P-256"},
                {"kty": "RSA", "kid": "k2", "n": "AQAB", "e": "AQAB", "use": "sig"}
            ]
        }))
        .unwrap();
        assert!(jwks.find_rsa("k1").is_none());
        assert_eq!(jwks.find_rsa("k2").and_then(|k| k.r#use.as_deref()), Some("sig"));
    }
}
