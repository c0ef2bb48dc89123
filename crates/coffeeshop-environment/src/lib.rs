//! Client environment record of the Coffee Shop web client
//!
//! Holds the production flag, the drinks API base URL and the Auth0 settings
//! the client needs to sign users in, plus the values derived from them.

pub mod absolute_url;
pub mod auth0;
pub mod cli;
pub mod codec;
pub mod environment;
pub mod error;

pub use absolute_url::AbsoluteUrl;
pub use auth0::{tenant_domain, Auth0Settings};
pub use environment::{Auth0Record, Environment, EnvironmentRecord, DEFAULT_ENVIRONMENT_FILE};
pub use error::{EnvironmentError, Result};
