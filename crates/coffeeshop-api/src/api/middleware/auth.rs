//! Bearer-token authentication against the Auth0 tenant

use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
    api::auth::{jwt_validator, AuthError, Permission},
    server::AppState,
};

/// Who made an authorized request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Subject of the access token
    pub user_id: String,

    /// RBAC permissions granted to the token
    pub permissions: Vec<String>,
}

/// Split `Authorization: Bearer <token>` and return the token
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let value = header.to_str().map_err(|_| AuthError::NotBearer)?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::NotBearer),
        [] => Err(AuthError::NotBearer),
        [_] => Err(AuthError::TokenNotFound),
        [_, token] => Ok(*token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Authenticate the request and require `permission`
#[instrument(level = "debug", skip(state, headers))]
pub async fn authorize(
    state: &AppState,
    headers: &HeaderMap,
    permission: Permission,
) -> Result<AuthContext, AuthError> {
    let token = extract_bearer_token(headers)?;

    let jwks = state.keys.jwks().await.map_err(|e| {
        warn!("Failed to fetch JWKS from Auth0: {}", e);
        AuthError::KeysUnavailable
    })?;

    let claims = jwt_validator::validate_token(token, &jwks, &state.token_expectations())?;
    jwt_validator::check_permission(&claims, permission)?;

    debug!(
        "Authorized {} for {} with permissions {:?}",
        claims.sub, permission, claims.permissions
    );

    Ok(AuthContext {
        user_id: claims.sub,
        permissions: claims.permissions.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers("bearer abc")), Ok("abc"));
    }

    #[test]
    fn test_extract_bearer_token_errors() {
        assert_eq!(
            extract_bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingHeader)
        );
        assert_eq!(
            extract_bearer_token(&headers("Basic dXNlcjpwYXNz")),
            Err(AuthError::NotBearer)
        );
        assert_eq!(
            extract_bearer_token(&headers("Bearer")),
            Err(AuthError::TokenNotFound)
        );
        assert_eq!(
            extract_bearer_token(&headers("Bearer abc def")),
            Err(AuthError::MalformedHeader)
        );
        assert_eq!(extract_bearer_token(&headers("")), Err(AuthError::NotBearer));
    }
}
