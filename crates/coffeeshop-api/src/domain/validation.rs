//! Input validation for drink payloads
//!
//! Every violation is collected so the client can show all of them at once.

use crate::domain::{DrinkChanges, Ingredient, NewDrink};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InputErrorKind {
    AttributeRequired,
    InvalidType,
    OutOfRange,
}

/// One rejected attribute of a request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InputError {
    pub attribute: String,
    #[serde(rename = "type")]
    pub kind: InputErrorKind,
    pub message: String,
}

impl InputError {
    fn required(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            message: format!("The attribute \"{attribute}\" is required."),
            attribute,
            kind: InputErrorKind::AttributeRequired,
        }
    }

    fn expected(attribute: impl Into<String>, what: &str) -> Self {
        let attribute = attribute.into();
        Self {
            message: format!("Expected \"{attribute}\" to be {what}."),
            attribute,
            kind: InputErrorKind::InvalidType,
        }
    }

    fn out_of_range(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            message: format!(
                "The value of \"{attribute}\" must be between {} and {}.",
                i64::MIN,
                i64::MAX
            ),
            attribute,
            kind: InputErrorKind::OutOfRange,
        }
    }
}

const STRING: &str = "a string";
const INTEGER: &str = "an integer";
const OBJECTS_ARRAY: &str = "an array of objects";
const OBJECT: &str = "an object";

/// Both `title` and `recipe` are required
pub fn validate_new_drink(data: &Map<String, Value>) -> Result<NewDrink, Vec<InputError>> {
    let mut errors = Vec::new();

    let title = match data.get("title") {
        None => {
            errors.push(InputError::required("title"));
            None
        }
        Some(value) => check_title(value, &mut errors),
    };

    let recipe = match data.get("recipe") {
        None => {
            errors.push(InputError::required("recipe"));
            None
        }
        Some(value) => check_recipe(value, &mut errors),
    };

    match (title, recipe) {
        (Some(title), Some(recipe)) if errors.is_empty() => Ok(NewDrink { title, recipe }),
        _ => Err(errors),
    }
}

/// `title` and `recipe` are optional but checked when present; other keys
/// are ignored
pub fn validate_drink_changes(data: &Map<String, Value>) -> Result<DrinkChanges, Vec<InputError>> {
    let mut errors = Vec::new();

    let title = data
        .get("title")
        .and_then(|value| check_title(value, &mut errors));
    let recipe = data
        .get("recipe")
        .and_then(|value| check_recipe(value, &mut errors));

    if errors.is_empty() {
        Ok(DrinkChanges { title, recipe })
    } else {
        Err(errors)
    }
}

fn check_title(value: &Value, errors: &mut Vec<InputError>) -> Option<String> {
    match value {
        Value::String(title) => Some(title.clone()),
        _ => {
            errors.push(InputError::expected("title", STRING));
            None
        }
    }
}

fn check_recipe(value: &Value, errors: &mut Vec<InputError>) -> Option<Vec<Ingredient>> {
    let Value::Array(items) = value else {
        errors.push(InputError::expected("recipe", OBJECTS_ARRAY));
        return None;
    };

    let before = errors.len();
    let recipe: Vec<Ingredient> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| check_ingredient(index, item, errors))
        .collect();

    (errors.len() == before).then_some(recipe)
}

fn check_ingredient(index: usize, item: &Value, errors: &mut Vec<InputError>) -> Option<Ingredient> {
    let Value::Object(fields) = item else {
        errors.push(InputError::expected(format!("recipe[{index}]"), OBJECT));
        return None;
    };

    let color = string_field(fields, index, "color", errors);
    let name = string_field(fields, index, "name", errors);

    let attribute = format!("recipe[{index}].parts");
    let parts = match fields.get("parts") {
        None => {
            errors.push(InputError::required(attribute));
            None
        }
        // booleans and floats are not integers
        Some(Value::Number(n)) if n.is_i64() => n.as_i64(),
        Some(Value::Number(n)) if n.is_u64() => {
            errors.push(InputError::out_of_range(attribute));
            None
        }
        Some(_) => {
            errors.push(InputError::expected(attribute, INTEGER));
            None
        }
    };

    Some(Ingredient {
        color: color?,
        name: name?,
        parts: parts?,
    })
}

fn string_field(
    fields: &Map<String, Value>,
    index: usize,
    key: &str,
    errors: &mut Vec<InputError>,
) -> Option<String> {
    let attribute = format!("recipe[{index}].{key}");
    match fields.get(key) {
        None => {
            errors.push(InputError::required(attribute));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(InputError::expected(attribute, STRING));
            None
        }
    }
}
