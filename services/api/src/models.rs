//! API models for request and response payloads

pub mod ingredient;
pub mod recipe;
pub mod tag;
pub mod user;

pub use ingredient::{Ingredient, IngredientQuery, NewIngredient};
pub use recipe::{
    CreateRecipeRequest, IngredientAmount, Recipe, RecipeIngredient, RecipeQuery, RecipeSummary,
    UpdateRecipeRequest,
};
pub use tag::Tag;
pub use user::{AuthorWithRecipes, SubscriptionsQuery, UserProfile};
