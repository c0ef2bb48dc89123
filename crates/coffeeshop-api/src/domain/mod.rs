//! Drinks on the menu and the rules for accepting them

pub mod drink;
pub mod validation;

pub use drink::{Drink, DrinkChanges, Ingredient, NewDrink, ShortDrink, ShortIngredient};
pub use validation::{validate_drink_changes, validate_new_drink, InputError, InputErrorKind};
