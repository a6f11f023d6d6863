//! Menu input validation. Collects one message per offending field rather
//! than failing on the first.

use crate::error::{AppError, FieldError};
use crate::menu::types::{CreateMenuInput, UpdateMenuInput, INGREDIENT_DELIMITER};

pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const CALORIES_MAX: i64 = 9999;
pub const PRICE_MAX: f64 = 999_999_999.0;
pub const INGREDIENTS_MAX: usize = 20;

fn check_name(name: &str, errors: &mut Vec<FieldError>) {
    if name.trim().is_empty() {
        errors.push(FieldError::new("name", "name is required"));
    } else if name.chars().count() > NAME_MAX {
        errors.push(FieldError::new(
            "name",
            format!("name must be at most {} characters", NAME_MAX),
        ));
    }
}

fn check_category(category: &str, errors: &mut Vec<FieldError>) {
    if category.trim().is_empty() {
        errors.push(FieldError::new("category", "category is required"));
    }
}

fn check_calories(calories: i64, errors: &mut Vec<FieldError>) {
    if calories < 0 {
        errors.push(FieldError::new("calories", "calories must not be negative"));
    } else if calories > CALORIES_MAX {
        errors.push(FieldError::new(
            "calories",
            format!("calories must be at most {}", CALORIES_MAX),
        ));
    }
}

fn check_price(price: f64, errors: &mut Vec<FieldError>) {
    if price < 0.0 {
        errors.push(FieldError::new("price", "price must not be negative"));
    } else if price > PRICE_MAX {
        errors.push(FieldError::new("price", "price is too large"));
    }
}

fn check_ingredients(ingredients: &[String], errors: &mut Vec<FieldError>) {
    if ingredients.is_empty() {
        errors.push(FieldError::new(
            "ingredients",
            "at least one ingredient is required",
        ));
        return;
    }
    if ingredients.len() > INGREDIENTS_MAX {
        errors.push(FieldError::new(
            "ingredients",
            format!("at most {} ingredients are allowed", INGREDIENTS_MAX),
        ));
    }
    if ingredients.iter().any(|i| i.trim().is_empty()) {
        errors.push(FieldError::new(
            "ingredients",
            "ingredients must not be empty",
        ));
    }
    if ingredients.iter().any(|i| i.contains(INGREDIENT_DELIMITER)) {
        errors.push(FieldError::new(
            "ingredients",
            format!(
                "ingredients must not contain the '{}' character",
                INGREDIENT_DELIMITER
            ),
        ));
    }
}

fn check_description(description: &str, errors: &mut Vec<FieldError>) {
    if description.trim().is_empty() {
        errors.push(FieldError::new("description", "description is required"));
    } else if description.chars().count() > DESCRIPTION_MAX {
        errors.push(FieldError::new(
            "description",
            format!("description must be at most {} characters", DESCRIPTION_MAX),
        ));
    }
}

pub fn validate_create(input: &CreateMenuInput) -> Result<(), AppError> {
    let mut errors = Vec::new();
    check_name(&input.name, &mut errors);
    check_category(&input.category, &mut errors);
    check_calories(input.calories, &mut errors);
    check_price(input.price, &mut errors);
    check_ingredients(&input.ingredients, &mut errors);
    check_description(&input.description, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Only provided fields are validated; absence is not an error.
pub fn validate_update(input: &UpdateMenuInput) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if let Some(name) = &input.name {
        check_name(name, &mut errors);
    }
    if let Some(category) = &input.category {
        check_category(category, &mut errors);
    }
    if let Some(calories) = input.calories {
        check_calories(calories, &mut errors);
    }
    if let Some(price) = input.price {
        check_price(price, &mut errors);
    }
    if let Some(ingredients) = &input.ingredients {
        check_ingredients(ingredients, &mut errors);
    }
    if let Some(description) = &input.description {
        check_description(description, &mut errors);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> CreateMenuInput {
        CreateMenuInput {
            name: "Nasi Goreng".into(),
            category: "food".into(),
            calories: 350,
            price: 15000.0,
            ingredients: vec!["nasi".into(), "telur".into()],
            description: "Fried rice with egg".into(),
        }
    }

    fn field_errors(result: Result<(), AppError>) -> Vec<String> {
        match result {
            Err(AppError::Validation(errors)) => {
                errors.into_iter().map(|e| e.field).collect()
            }
            _ => panic!("expected validation error"),
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(validate_create(&valid_input()).is_ok());
    }

    #[test]
    fn collects_one_error_per_offending_field() {
        let mut input = valid_input();
        input.name = String::new();
        input.calories = 10_000;
        input.ingredients = vec![];
        let fields = field_errors(validate_create(&input));
        assert_eq!(fields, vec!["name", "calories", "ingredients"]);
    }

    #[test]
    fn rejects_delimiter_inside_ingredient() {
        let mut input = valid_input();
        input.ingredients = vec!["nasi|telur".into()];
        let fields = field_errors(validate_create(&input));
        assert_eq!(fields, vec!["ingredients"]);
    }

    #[test]
    fn rejects_negative_price_and_calories() {
        let mut input = valid_input();
        input.price = -1.0;
        input.calories = -5;
        let fields = field_errors(validate_create(&input));
        assert_eq!(fields, vec!["calories", "price"]);
    }

    #[test]
    fn rejects_over_long_name_and_description() {
        let mut input = valid_input();
        input.name = "x".repeat(NAME_MAX + 1);
        input.description = "y".repeat(DESCRIPTION_MAX + 1);
        let fields = field_errors(validate_create(&input));
        assert_eq!(fields, vec!["name", "description"]);
    }

    #[test]
    fn rejects_too_many_ingredients() {
        let mut input = valid_input();
        input.ingredients = (0..=INGREDIENTS_MAX).map(|i| format!("item{}", i)).collect();
        let fields = field_errors(validate_create(&input));
        assert_eq!(fields, vec!["ingredients"]);
    }

    #[test]
    fn update_validates_only_provided_fields() {
        let input = UpdateMenuInput {
            price: Some(-10.0),
            ..Default::default()
        };
        let fields = field_errors(validate_update(&input));
        assert_eq!(fields, vec!["price"]);

        assert!(validate_update(&UpdateMenuInput::default()).is_ok());
    }

    #[test]
    fn update_rejects_blank_name() {
        let input = UpdateMenuInput {
            name: Some("   ".into()),
            ..Default::default()
        };
        let fields = field_errors(validate_update(&input));
        assert_eq!(fields, vec!["name"]);
    }
}
