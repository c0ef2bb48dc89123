//! API module for the Coffee Shop drinks API

pub mod auth;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod types;

use crate::{error::ApiError, server::AppState};
use axum::{
    routing::{get, patch},
    Json, Router,
};
use utoipa::OpenApi;

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/drinks",
            get(routes::drinks::list_drinks).post(routes::drinks::create_drink),
        )
        .route("/drinks-detail", get(routes::drinks::list_drink_details))
        .route(
            "/drinks/:id",
            patch(routes::drinks::update_drink).delete(routes::drinks::delete_drink),
        )
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(not_found)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        routes::drinks::list_drinks,
        routes::drinks::list_drink_details,
        routes::drinks::create_drink,
        routes::drinks::update_drink,
        routes::drinks::delete_drink,
        routes::health::health_check,
    ),
    components(schemas(
        crate::domain::Drink,
        crate::domain::Ingredient,
        crate::domain::ShortDrink,
        crate::domain::ShortIngredient,
        crate::domain::InputError,
        crate::domain::InputErrorKind,
        types::MenuResponse,
        types::DrinksResponse,
        types::DeleteDrinkResponse,
        types::HealthCheckResponse,
        crate::error::ErrorResponse,
    )),
    tags(
        (name = "drinks", description = "Drinks menu management"),
        (name = "health", description = "Health and monitoring"),
    ),
    info(
        title = "Coffee Shop API",
        version = "1.0.0",
        description = "Drinks menu of the Coffee Shop. Write access requires Auth0 RBAC permissions.",
        license(
            name = "MIT",
        ),
    ),
    servers(
        (url = "http://127.0.0.1:5000", description = "Local development"),
    ),
)]
pub struct ApiDoc;
