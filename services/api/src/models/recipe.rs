//! Recipe models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Tag, UserProfile};

/// Short recipe view returned by favorite/cart toggles and subscription feeds
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

/// Ingredient line of a recipe
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeIngredient {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Full recipe view
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: Uuid,
    pub tags: Vec<Tag>,
    pub author: UserProfile,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

/// Ingredient reference in a create/update payload
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IngredientAmount {
    pub id: Uuid,
    pub amount: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipeRequest {
    pub ingredients: Vec<IngredientAmount>,
    #[serde(default)]
    pub tags: Vec<Uuid>,
    /// Image URL or data URI
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Partial update; present `ingredients`/`tags` replace the whole set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRecipeRequest {
    pub ingredients: Option<Vec<IngredientAmount>>,
    pub tags: Option<Vec<Uuid>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

/// Query parameters for recipe listing
///
/// `tags` may repeat (`?tags=breakfast&tags=lunch`) and matches any of them.
/// The two flags take `1` to enable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub author: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<u8>,
    pub is_in_shopping_cart: Option<u8>,
}

impl RecipeQuery {
    pub fn only_favorited(&self) -> bool {
        self.is_favorited == Some(1)
    }

    pub fn only_in_shopping_cart(&self) -> bool {
        self.is_in_shopping_cart == Some(1)
    }
}
