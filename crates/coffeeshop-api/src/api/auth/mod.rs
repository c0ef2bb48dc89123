//! Auth0 access-token verification

mod error;
pub mod jwks;
pub mod jwt_validator;
mod permission;

pub use error::AuthError;
pub use jwks::{JwksError, KeySource, RemoteKeySource, StaticKeySource};
pub use jwt_validator::{Claims, Jwk, JwkSet, TokenExpectations};
pub use permission::Permission;
