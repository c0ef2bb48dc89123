//! Drink persistence

mod sqlite;

pub use sqlite::SqliteDrinkRepository;

use crate::domain::{Drink, DrinkChanges, NewDrink};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// A unique column already holds the value
    #[error("Value for attribute {attribute} is already taken")]
    Conflict { attribute: String },

    #[error("Stored recipe of drink {id} is unreadable: {reason}")]
    CorruptRecipe { id: i64, reason: String },

    #[error("Failed to encode recipe: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[async_trait]
pub trait DrinkRepository: Send + Sync {
    /// All drinks in id order
    async fn list(&self) -> Result<Vec<Drink>>;

    async fn get(&self, id: i64) -> Result<Option<Drink>>;

    async fn create(&self, drink: &NewDrink) -> Result<Drink>;

    /// `None` when no drink has `id`
    async fn update(&self, id: i64, changes: DrinkChanges) -> Result<Option<Drink>>;

    /// `false` when no drink has `id`
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Drop every drink and seed the menu with water
    async fn reset(&self) -> Result<()>;
}
