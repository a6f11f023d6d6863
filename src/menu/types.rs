//! Menu records and request/filter shapes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator for the persisted ingredients column. Ingredient strings must
/// not contain it; validation rejects them before they reach the store.
pub const INGREDIENT_DELIMITER: char = '|';

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MenuRecord {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub calories: i32,
    pub price: f64,
    pub ingredients: Vec<String>,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CreateMenuInput {
    pub name: String,
    pub category: String,
    pub calories: i64,
    pub price: f64,
    pub ingredients: Vec<String>,
    pub description: String,
}

/// Partial-update variant: only provided fields are written.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct UpdateMenuInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub calories: Option<i64>,
    pub price: Option<f64>,
    pub ingredients: Option<Vec<String>>,
    pub description: Option<String>,
}

impl UpdateMenuInput {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.calories.is_none()
            && self.price.is_none()
            && self.ingredients.is_none()
            && self.description.is_none()
    }
}

/// Loose, possibly-absent search filters.
#[derive(Clone, Debug, Default)]
pub struct MenuFilters {
    pub category: Option<String>,
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub max_calories: Option<i64>,
}

pub fn join_ingredients(items: &[String]) -> String {
    items.join(&INGREDIENT_DELIMITER.to_string())
}

pub fn split_ingredients(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(INGREDIENT_DELIMITER).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingredients_round_trip() {
        let items = vec!["nasi".to_string(), "telur".to_string(), "kecap".to_string()];
        assert_eq!(join_ingredients(&items), "nasi|telur|kecap");
        assert_eq!(split_ingredients(&join_ingredients(&items)), items);
    }

    #[test]
    fn single_ingredient_round_trip() {
        let items = vec!["ayam".to_string()];
        assert_eq!(split_ingredients(&join_ingredients(&items)), items);
    }

    #[test]
    fn empty_column_splits_to_empty_list() {
        assert!(split_ingredients("").is_empty());
    }
}
