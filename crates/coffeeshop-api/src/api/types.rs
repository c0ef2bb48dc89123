//! Response bodies of the drinks API

use crate::domain::{Drink, ShortDrink};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public menu
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuResponse {
    pub success: bool,
    pub drinks: Vec<ShortDrink>,
}

/// Drinks with full recipes
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DrinksResponse {
    pub success: bool,
    pub drinks: Vec<Drink>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    /// Id of the deleted drink
    pub delete: i64,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheckResponse {
    pub success: bool,

    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Drinks currently on the menu
    pub drinks: usize,
}
