use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One ingredient of a recipe, poured in `parts` proportion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    pub color: String,
    pub name: String,
    pub parts: i64,
}

/// A drink with its full recipe; this is also the detailed (`long`) view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Ingredient as shown on the public menu: no names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: i64,
}

/// Public menu view of a drink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

impl Drink {
    pub fn short(&self) -> ShortDrink {
        ShortDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|ingredient| ShortIngredient {
                    color: ingredient.color.clone(),
                    parts: ingredient.parts,
                })
                .collect(),
        }
    }

    pub fn long(&self) -> Drink {
        self.clone()
    }

    /// Apply a validated partial update
    pub fn apply(&mut self, changes: DrinkChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(recipe) = changes.recipe {
            self.recipe = recipe;
        }
    }
}

/// A validated drink that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Validated fields of a partial update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrinkChanges {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

impl DrinkChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}
