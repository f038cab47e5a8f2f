//! Ingredient catalogue models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

/// Catalogue entry as found in the import file
#[derive(Debug, Clone, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

/// Query parameters for ingredient listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientQuery {
    /// Case-insensitive name prefix
    pub name: Option<String>,
}
