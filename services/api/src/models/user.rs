//! User views as seen by other users

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::RecipeSummary;

/// Public profile; `is_subscribed` is relative to the caller
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

/// An author the caller follows, with a page of their recipes
#[derive(Debug, Clone, Serialize)]
pub struct AuthorWithRecipes {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: i64,
}

/// Query parameters for the subscriptions listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Maximum number of recipes embedded per author
    pub recipes_limit: Option<u32>,
}
