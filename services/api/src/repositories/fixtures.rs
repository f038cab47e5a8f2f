//! Seed data for tests that run against a live PostgreSQL instance

use common::database::{DatabaseConfig, init_pool, prepare_db};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CreateRecipeRequest, IngredientAmount};

use super::RecipeRepository;

pub async fn live_pool() -> PgPool {
    let config = DatabaseConfig::from_env().unwrap();
    let pool = init_pool(&config).await.unwrap();
    prepare_db(&pool).await.unwrap();
    pool
}

pub async fn user(pool: &PgPool, name: &str) -> Uuid {
    let suffix = Uuid::new_v4().simple().to_string();
    sqlx::query_scalar(
        r#"
        INSERT INTO users (email, username, first_name, last_name, password_hash)
        VALUES ($1, $2, $3, $3, 'x')
        RETURNING id
        "#,
    )
    .bind(format!("{}-{}@example.com", name, suffix))
    .bind(format!("{}_{}", name, &suffix[..8]))
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn ingredient(pool: &PgPool, name: &str, unit: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(unit)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn recipe(pool: &PgPool, author: Uuid, name: &str, ingredients: &[(Uuid, i32)]) -> Uuid {
    let payload = CreateRecipeRequest {
        ingredients: ingredients
            .iter()
            .map(|&(id, amount)| IngredientAmount { id, amount })
            .collect(),
        tags: Vec::new(),
        image: format!("https://img.example.com/{}.png", name),
        name: name.to_string(),
        text: "Mix and cook.".to_string(),
        cooking_time: 10,
    };

    RecipeRepository::new(pool.clone())
        .create(author, &payload)
        .await
        .unwrap()
}

/// Remove users (cascading to their recipes and join rows) and ingredients
pub async fn cleanup(pool: &PgPool, users: &[Uuid], ingredients: &[Uuid]) {
    sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(users)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM ingredients WHERE id = ANY($1)")
        .bind(ingredients)
        .execute(pool)
        .await
        .unwrap();
}
