//! Application state shared across handlers

use common::token::TokenVerifier;
use sqlx::PgPool;

use crate::{
    config::ApiConfig,
    repositories::{
        CartRepository, FavoriteRepository, IngredientRepository, RecipeRepository,
        SubscriptionRepository, TagRepository, UserRepository,
    },
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub verifier: TokenVerifier,
    pub recipes: RecipeRepository,
    pub ingredients: IngredientRepository,
    pub tags: TagRepository,
    pub users: UserRepository,
    pub favorites: FavoriteRepository,
    pub cart: CartRepository,
    pub subscriptions: SubscriptionRepository,
}

impl AppState {
    pub fn new(pool: PgPool, config: ApiConfig, verifier: TokenVerifier) -> Self {
        Self {
            config,
            verifier,
            recipes: RecipeRepository::new(pool.clone()),
            ingredients: IngredientRepository::new(pool.clone()),
            tags: TagRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            favorites: FavoriteRepository::new(pool.clone()),
            cart: CartRepository::new(pool.clone()),
            subscriptions: SubscriptionRepository::new(pool),
        }
    }
}
