//! Drink route handlers

use crate::{
    api::{
        extractors::{Authorized, CanDeleteDrinks, CanGetDrinksDetail, CanPatchDrinks, CanPostDrinks},
        types::{DeleteDrinkResponse, DrinksResponse, MenuResponse},
    },
    domain::{validate_drink_changes, validate_new_drink},
    error::{ApiError, Result},
    server::AppState,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde_json::{Map, Value};
use tracing::info;

/// List the menu: colors and proportions only
#[utoipa::path(
    get,
    path = "/drinks",
    responses(
        (status = 200, description = "Public menu", body = MenuResponse),
    ),
    tag = "drinks",
)]
pub async fn list_drinks(State(state): State<AppState>) -> Result<Json<MenuResponse>> {
    let drinks = state.drinks.list().await?;

    Ok(Json(MenuResponse {
        success: true,
        drinks: drinks.iter().map(|d| d.short()).collect(),
    }))
}

/// List drinks with full recipes. Requires `get:drinks-detail`.
#[utoipa::path(
    get,
    path = "/drinks-detail",
    responses(
        (status = 200, description = "Drinks with recipes", body = DrinksResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Permission not granted", body = crate::error::ErrorResponse),
    ),
    tag = "drinks",
)]
pub async fn list_drink_details(
    _auth: Authorized<CanGetDrinksDetail>,
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse>> {
    let drinks = state.drinks.list().await?;

    Ok(Json(DrinksResponse {
        success: true,
        drinks: drinks.iter().map(|d| d.long()).collect(),
    }))
}

/// Add a drink. Requires `post:drinks`.
#[utoipa::path(
    post,
    path = "/drinks",
    request_body(content = crate::domain::Drink, description = "`title` and `recipe`"),
    responses(
        (status = 200, description = "The created drink", body = DrinksResponse),
        (status = 400, description = "Invalid input or duplicate title", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Permission not granted", body = crate::error::ErrorResponse),
        (status = 422, description = "Body is not a JSON object", body = crate::error::ErrorResponse),
    ),
    tag = "drinks",
)]
pub async fn create_drink(
    auth: Authorized<CanPostDrinks>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DrinksResponse>> {
    let data = parse_object(&body)?;
    let new_drink = validate_new_drink(&data).map_err(|errors| ApiError::InvalidInput { errors })?;

    let drink = state.drinks.create(&new_drink).await?;
    info!("{} added drink {} ({})", auth.context.user_id, drink.id, drink.title);

    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![drink.long()],
    }))
}

/// Change a drink's title and/or recipe. Requires `patch:drinks`.
#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    params(("id" = i64, Path, description = "Drink id")),
    request_body(content = crate::domain::Drink, description = "Optional `title` and `recipe`"),
    responses(
        (status = 200, description = "The updated drink", body = DrinksResponse),
        (status = 400, description = "Invalid input or duplicate title", body = crate::error::ErrorResponse),
        (status = 404, description = "No such drink", body = crate::error::ErrorResponse),
    ),
    tag = "drinks",
)]
pub async fn update_drink(
    auth: Authorized<CanPatchDrinks>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<DrinksResponse>> {
    let data = parse_object(&body)?;
    let changes =
        validate_drink_changes(&data).map_err(|errors| ApiError::InvalidInput { errors })?;

    let id = parse_id(&id)?;
    let drink = state
        .drinks
        .update(id, changes)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!("{} updated drink {}", auth.context.user_id, id);

    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![drink.long()],
    }))
}

/// Remove a drink. Requires `delete:drinks`.
#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    params(("id" = i64, Path, description = "Drink id")),
    responses(
        (status = 200, description = "Id of the deleted drink", body = DeleteDrinkResponse),
        (status = 404, description = "No such drink", body = crate::error::ErrorResponse),
    ),
    tag = "drinks",
)]
pub async fn delete_drink(
    auth: Authorized<CanDeleteDrinks>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteDrinkResponse>> {
    let id = parse_id(&id)?;
    if !state.drinks.delete(id).await? {
        return Err(ApiError::NotFound);
    }
    info!("{} deleted drink {}", auth.context.user_id, id);

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: id,
    }))
}

/// Ids that are not integers cannot name a drink
fn parse_id(id: &str) -> Result<i64> {
    id.parse().map_err(|_| ApiError::NotFound)
}

/// The body must be a non-empty JSON object. Empty or falsy JSON is a bad
/// request; any other non-object is unprocessable.
fn parse_object(body: &[u8]) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::BadRequest)?;

    match value {
        Value::Object(map) if map.is_empty() => Err(ApiError::BadRequest),
        Value::Object(map) => Ok(map),
        Value::Null | Value::Bool(false) => Err(ApiError::BadRequest),
        Value::Array(ref items) if items.is_empty() => Err(ApiError::BadRequest),
        Value::String(ref s) if s.is_empty() => Err(ApiError::BadRequest),
        Value::Number(ref n) if n.as_f64() == Some(0.0) => Err(ApiError::BadRequest),
        _ => Err(ApiError::Unprocessable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(ApiError::NotFound)));
        assert!(matches!(parse_id("1.5"), Err(ApiError::NotFound)));
    }

    #[test]
    fn test_parse_object() {
        assert_eq!(parse_object(br#"{"title": "mocha"}"#).unwrap()["title"], "mocha");

        for bad in ["", "   ", "{", "{}", "null", "[]", "0", "false", "\"\""] {
            assert!(
                matches!(parse_object(bad.as_bytes()), Err(ApiError::BadRequest)),
                "{bad}"
            );
        }
        for unprocessable in ["[1]", "\"mocha\"", "7", "true"] {
            assert!(
                matches!(parse_object(unprocessable.as_bytes()), Err(ApiError::Unprocessable)),
                "{unprocessable}"
            );
        }
    }
}
