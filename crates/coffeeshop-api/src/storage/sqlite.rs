use crate::config::DatabaseConfig;
use crate::domain::{Drink, DrinkChanges, Ingredient, NewDrink};
use crate::storage::{DrinkRepository, Result, StorageError};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

const CREATE_DRINK_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS drink (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        recipe TEXT NOT NULL
    )
"#;

/// Drinks stored in SQLite, recipes as JSON text
#[derive(Debug, Clone)]
pub struct SqliteDrinkRepository {
    pool: SqlitePool,
}

impl SqliteDrinkRepository {
    /// Open the configured database, creating the file and table if needed
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let in_memory = config.url.contains(":memory:");
        let url = if in_memory || config.url.contains('?') {
            config.url.clone()
        } else {
            format!("{}?mode=rwc", config.url)
        };

        // every in-memory connection is a separate database
        let max_connections = if in_memory { 1 } else { config.max_connections };

        let mut options = SqlitePoolOptions::new().max_connections(max_connections);
        if in_memory {
            options = options.idle_timeout(None).max_lifetime(None);
        }
        let pool = options.connect(&url).await?;

        let instance = Self { pool };
        instance.run_migrations().await?;
        info!("Connected to drink database at {}", config.url);

        Ok(instance)
    }

    /// Empty in-memory database
    pub async fn in_memory() -> Result<Self> {
        Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            reset_on_startup: false,
        })
        .await
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(CREATE_DRINK_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, title: &str, recipe: &[Ingredient]) -> Result<i64> {
        let result = sqlx::query("INSERT INTO drink (title, recipe) VALUES (?, ?)")
            .bind(title)
            .bind(encode_recipe(recipe)?)
            .execute(&self.pool)
            .await
            .map_err(map_constraint_error)?;
        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl DrinkRepository for SqliteDrinkRepository {
    async fn list(&self) -> Result<Vec<Drink>> {
        let rows = sqlx::query("SELECT id, title, recipe FROM drink ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(drink_from_row).collect()
    }

    async fn get(&self, id: i64) -> Result<Option<Drink>> {
        let row = sqlx::query("SELECT id, title, recipe FROM drink WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(drink_from_row).transpose()
    }

    async fn create(&self, drink: &NewDrink) -> Result<Drink> {
        let id = self.insert(&drink.title, &drink.recipe).await?;
        debug!("Created drink {} ({})", id, drink.title);
        Ok(Drink {
            id,
            title: drink.title.clone(),
            recipe: drink.recipe.clone(),
        })
    }

    async fn update(&self, id: i64, changes: DrinkChanges) -> Result<Option<Drink>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT id, title, recipe FROM drink WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(mut drink) = row.as_ref().map(drink_from_row).transpose()? else {
            return Ok(None);
        };
        if changes.is_empty() {
            return Ok(Some(drink));
        }
        drink.apply(changes);

        let result = sqlx::query("UPDATE drink SET title = ?, recipe = ? WHERE id = ?")
            .bind(&drink.title)
            .bind(encode_recipe(&drink.recipe)?)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_constraint_error)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        tx.commit().await?;

        debug!("Updated drink {}", id);
        Ok(Some(drink))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM drink WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reset(&self) -> Result<()> {
        sqlx::query("DROP TABLE IF EXISTS drink")
            .execute(&self.pool)
            .await?;
        self.run_migrations().await?;

        let water = vec![Ingredient {
            color: "blue".to_string(),
            name: "water".to_string(),
            parts: 1,
        }];
        self.insert("water", &water).await?;

        info!("Drink table reset and seeded");
        Ok(())
    }
}

fn drink_from_row(row: &SqliteRow) -> Result<Drink> {
    let id: i64 = row.try_get("id")?;
    let recipe: String = row.try_get("recipe")?;
    let recipe = serde_json::from_str(&recipe).map_err(|e| StorageError::CorruptRecipe {
        id,
        reason: e.to_string(),
    })?;

    Ok(Drink {
        id,
        title: row.try_get("title")?,
        recipe,
    })
}

fn encode_recipe(recipe: &[Ingredient]) -> Result<String> {
    Ok(serde_json::to_string(recipe)?)
}

/// `UNIQUE constraint failed: drink.title` becomes a conflict on `title`
fn map_constraint_error(err: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            let attribute = message
                .rsplit_once('.')
                .map(|(_, column)| column)
                .unwrap_or(message)
                .trim()
                .to_string();
            return StorageError::Conflict { attribute };
        }
    }
    StorageError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_drink(title: &str) -> NewDrink {
        NewDrink {
            title: title.to_string(),
            recipe: vec![Ingredient {
                color: "brown".to_string(),
                name: "espresso".to_string(),
                parts: 1,
            }],
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let repo = SqliteDrinkRepository::in_memory().await.unwrap();
        let espresso = repo.create(&new_drink("espresso")).await.unwrap();
        let ristretto = repo.create(&new_drink("ristretto")).await.unwrap();

        assert!(ristretto.id > espresso.id);
        assert_eq!(repo.list().await.unwrap(), vec![espresso.clone(), ristretto]);
        assert_eq!(repo.get(espresso.id).await.unwrap(), Some(espresso));
        assert_eq!(repo.get(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_title_is_a_conflict() {
        let repo = SqliteDrinkRepository::in_memory().await.unwrap();
        repo.create(&new_drink("espresso")).await.unwrap();

        match repo.create(&new_drink("espresso")).await {
            Err(StorageError::Conflict { attribute }) => assert_eq!(attribute, "title"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_conflict_and_missing() {
        let repo = SqliteDrinkRepository::in_memory().await.unwrap();
        repo.create(&new_drink("espresso")).await.unwrap();
        let latte = repo.create(&new_drink("latte")).await.unwrap();

        let changes = DrinkChanges {
            title: Some("espresso".to_string()),
            recipe: None,
        };
        assert!(matches!(
            repo.update(latte.id, changes).await,
            Err(StorageError::Conflict { .. })
        ));
        assert_eq!(
            repo.update(999, DrinkChanges::default()).await.unwrap(),
            None
        );

        let renamed = repo
            .update(
                latte.id,
                DrinkChanges {
                    title: Some("flat white".to_string()),
                    recipe: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.title, "flat white");
        assert_eq!(repo.get(latte.id).await.unwrap(), Some(renamed));
    }

    #[tokio::test]
    async fn test_update_without_changes_keeps_drink() {
        let repo = SqliteDrinkRepository::in_memory().await.unwrap();
        let latte = repo.create(&new_drink("latte")).await.unwrap();

        let unchanged = repo.update(latte.id, DrinkChanges::default()).await.unwrap();
        assert_eq!(unchanged, Some(latte.clone()));
        assert_eq!(repo.get(latte.id).await.unwrap(), Some(latte));
    }

    #[tokio::test]
    async fn test_update_after_delete_is_missing() {
        let repo = SqliteDrinkRepository::in_memory().await.unwrap();
        let latte = repo.create(&new_drink("latte")).await.unwrap();
        repo.delete(latte.id).await.unwrap();

        let changes = DrinkChanges {
            title: Some("flat white".to_string()),
            recipe: None,
        };
        assert_eq!(repo.update(latte.id, changes).await.unwrap(), None);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_leaves_row_untouched() {
        let repo = SqliteDrinkRepository::in_memory().await.unwrap();
        repo.create(&new_drink("espresso")).await.unwrap();
        let latte = repo.create(&new_drink("latte")).await.unwrap();

        let changes = DrinkChanges {
            title: Some("espresso".to_string()),
            recipe: Some(Vec::new()),
        };
        assert!(repo.update(latte.id, changes).await.is_err());
        // the rolled-back transaction released the single in-memory connection
        assert_eq!(repo.get(latte.id).await.unwrap(), Some(latte));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = SqliteDrinkRepository::in_memory().await.unwrap();
        let drink = repo.create(&new_drink("espresso")).await.unwrap();
        assert!(repo.delete(drink.id).await.unwrap());
        assert!(!repo.delete(drink.id).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reset_seeds_water() {
        let repo = SqliteDrinkRepository::in_memory().await.unwrap();
        repo.create(&new_drink("espresso")).await.unwrap();
        repo.reset().await.unwrap();

        let drinks = repo.list().await.unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].id, 1);
        assert_eq!(drinks[0].title, "water");
        assert_eq!(drinks[0].recipe[0].color, "blue");
    }

    #[tokio::test]
    async fn test_connect_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drinks.db");
        let config = DatabaseConfig {
            url: format!("sqlite:{}", path.display()),
            ..DatabaseConfig::default()
        };

        let repo = SqliteDrinkRepository::connect(&config).await.unwrap();
        repo.create(&new_drink("espresso")).await.unwrap();
        assert!(path.exists());
    }
}
