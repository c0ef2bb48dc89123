//! Health check route handler

use crate::{api::types::HealthCheckResponse, error::Result, server::AppState, VERSION};
use axum::{extract::State, Json};
use tracing::debug;

/// Report service status; fails when the database is unreachable
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheckResponse),
        (status = 500, description = "Database unavailable", body = crate::error::ErrorResponse),
    ),
    tag = "health",
)]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthCheckResponse>> {
    let drinks = state.drinks.list().await?.len();
    debug!("Health check: {} drinks on the menu", drinks);

    Ok(Json(HealthCheckResponse {
        success: true,
        status: "ok".to_string(),
        version: VERSION.to_string(),
        timestamp: chrono::Utc::now(),
        drinks,
    }))
}
