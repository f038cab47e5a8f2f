//! Recipe payload validation
//!
//! These checks need no database access. Whether referenced tags and
//! ingredients exist is checked by the handlers afterwards.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{CreateRecipeRequest, IngredientAmount, UpdateRecipeRequest};

const MAX_RECIPE_NAME_LENGTH: usize = 200;

pub fn validate_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Recipe name is required".to_string());
    }
    if name.chars().count() > MAX_RECIPE_NAME_LENGTH {
        return Err(format!(
            "Recipe name must be at most {} characters long",
            MAX_RECIPE_NAME_LENGTH
        ));
    }
    Ok(())
}

fn require(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(())
}

pub fn validate_cooking_time(minutes: i32) -> Result<(), String> {
    if minutes < 1 {
        return Err("Cooking time must be at least 1 minute".to_string());
    }
    Ok(())
}

pub fn validate_ingredients(ingredients: &[IngredientAmount]) -> Result<(), String> {
    if ingredients.is_empty() {
        return Err("A recipe needs at least one ingredient".to_string());
    }

    let mut seen = HashSet::with_capacity(ingredients.len());
    for ingredient in ingredients {
        if ingredient.amount < 1 {
            return Err(format!(
                "Amount of ingredient {} must be at least 1",
                ingredient.id
            ));
        }
        if !seen.insert(ingredient.id) {
            return Err(format!("Ingredient {} is listed twice", ingredient.id));
        }
    }
    Ok(())
}

pub fn validate_tags(tags: &[Uuid]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(tags.len());
    for tag in tags {
        if !seen.insert(*tag) {
            return Err(format!("Tag {} is listed twice", tag));
        }
    }
    Ok(())
}

/// Validate a new recipe
pub fn validate_new_recipe(payload: &CreateRecipeRequest) -> Result<(), String> {
    validate_name(&payload.name)?;
    require(&payload.text, "Recipe text")?;
    require(&payload.image, "Image")?;
    validate_cooking_time(payload.cooking_time)?;
    validate_ingredients(&payload.ingredients)?;
    validate_tags(&payload.tags)
}

/// Validate the fields present in a partial update
pub fn validate_recipe_update(payload: &UpdateRecipeRequest) -> Result<(), String> {
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    if let Some(text) = &payload.text {
        require(text, "Recipe text")?;
    }
    if let Some(image) = &payload.image {
        require(image, "Image")?;
    }
    if let Some(minutes) = payload.cooking_time {
        validate_cooking_time(minutes)?;
    }
    if let Some(ingredients) = &payload.ingredients {
        validate_ingredients(ingredients)?;
    }
    if let Some(tags) = &payload.tags {
        validate_tags(tags)?;
    }
    Ok(())
}
