//! Error types for the Coffee Shop drinks API

use crate::api::auth::AuthError;
use crate::domain::InputError;
use crate::storage::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Main error type for the drinks API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, empty or unparseable request body
    #[error("The server could not understand the request.")]
    BadRequest,

    /// Body failed validation
    #[error("The request could not be processed due to invalid data.")]
    InvalidInput { errors: Vec<InputError> },

    #[error("The server does not recognize the url.")]
    NotFound,

    #[error("The HTTP method is not allowed for the requested url.")]
    MethodNotAllowed,

    /// Body over the request size limit
    #[error("The request payload is too large.")]
    PayloadTooLarge,

    /// Well-formed JSON that is not an object
    #[error("The request was well-formed but could not be processed due to semantic errors.")]
    Unprocessable,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] coffeeshop_common::ConfigurationError),

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;

const INTERNAL_ERROR_MESSAGE: &str =
    "We apologize. Our service seems to have experienced an unexpected error.";

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest | ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Storage(StorageError::Conflict { .. }) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Auth(e) => e.status(),
            ApiError::Storage(_)
            | ApiError::Config(_)
            | ApiError::Internal { .. }
            | ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the client; server-side details are never exposed
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Storage(StorageError::Conflict { attribute }) => {
                format!("The value provided for attribute \"{attribute}\" is already taken.")
            }
            _ if self.status().is_server_error() && !matches!(self, ApiError::Auth(_)) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self);
        }

        let input_errors = match self {
            ApiError::InvalidInput { ref errors } => Some(errors.clone()),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            message: self.client_message(),
            input_errors,
        };

        (status, Json(body)).into_response()
    }
}

/// Error response structure for API documentation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,

    /// HTTP status code
    pub error: u16,

    /// Human-readable error message
    pub message: String,

    /// Rejected attributes, for invalid input only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_errors: Option<Vec<InputError>>,
}
