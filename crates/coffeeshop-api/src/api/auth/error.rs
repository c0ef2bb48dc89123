use axum::http::StatusCode;
use thiserror::Error;

/// Authentication and authorization failures. The display text is the
/// description returned to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingHeader,

    #[error("Authorization header must start with \"Bearer\".")]
    NotBearer,

    #[error("Token not found.")]
    TokenNotFound,

    #[error("Authorization header must be bearer token.")]
    MalformedHeader,

    #[error("Unable to find the appropriate key.")]
    KeyNotFound,

    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,

    #[error("Token expired.")]
    TokenExpired,

    #[error("Unable to parse authentication token.")]
    Unparseable,

    #[error("Permissions not included in JWT.")]
    PermissionsMissing,

    #[error("Permission not found.")]
    PermissionDenied,

    #[error("Unable to verify token: signing keys are unavailable.")]
    KeysUnavailable,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::NotBearer
            | AuthError::TokenNotFound
            | AuthError::MalformedHeader
            | AuthError::InvalidClaims
            | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::KeyNotFound | AuthError::Unparseable | AuthError::PermissionsMissing => {
                StatusCode::BAD_REQUEST
            }
            AuthError::PermissionDenied => StatusCode::FORBIDDEN,
            AuthError::KeysUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Machine-readable code, logged with every rejection
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization_header_missing",
            AuthError::NotBearer
            | AuthError::TokenNotFound
            | AuthError::MalformedHeader
            | AuthError::KeyNotFound
            | AuthError::Unparseable => "invalid_header",
            AuthError::InvalidClaims | AuthError::PermissionsMissing => "invalid_claims",
            AuthError::TokenExpired => "token_expired",
            AuthError::PermissionDenied => "unauthorized",
            AuthError::KeysUnavailable => "jwks_unavailable",
        }
    }
}
