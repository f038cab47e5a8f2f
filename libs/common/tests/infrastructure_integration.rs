//! Integration tests for the database schema
//!
//! These tests need a reachable PostgreSQL instance (see `DATABASE_URL`)
//! and are ignored by default. Run them with `cargo test -- --ignored`.

use common::database::{DatabaseConfig, health_check, init_pool, prepare_db};
use sqlx::Row;
use uuid::Uuid;

async fn insert_user(pool: &sqlx::PgPool, name: &str) -> Result<Uuid, sqlx::Error> {
    let suffix = Uuid::new_v4().simple().to_string();
    let row = sqlx::query(
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
    .await?;
    Ok(row.get("id"))
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_schema_bootstrap_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    let pool = init_pool(&config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    prepare_db(&pool).await?;
    prepare_db(&pool).await?;

    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS tables
        FROM information_schema.tables
        WHERE table_schema = current_schema() AND table_name = ANY($1)
        "#,
    )
    .bind(vec![
        "users",
        "ingredients",
        "tags",
        "recipes",
        "recipe_ingredients",
        "recipe_tags",
        "favorites",
        "shopping_cart",
        "subscriptions",
    ])
    .fetch_one(&pool)
    .await?;
    let tables: i64 = row.get("tables");
    assert_eq!(tables, 9);

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_recipe_delete_cascades_to_join_rows() -> Result<(), Box<dyn std::error::Error>> {
    let pool = init_pool(&DatabaseConfig::from_env()?).await?;
    prepare_db(&pool).await?;

    let author = insert_user(&pool, "author").await?;
    let reader = insert_user(&pool, "reader").await?;

    let recipe_id: Uuid = sqlx::query(
        "INSERT INTO recipes (author_id, name, image, text, cooking_time) VALUES ($1, 'Pie', 'pie.png', 'Bake', 30) RETURNING id",
    )
    .bind(author)
    .fetch_one(&pool)
    .await?
    .get("id");

    sqlx::query("INSERT INTO favorites (user_id, recipe_id) VALUES ($1, $2)")
        .bind(reader)
        .bind(recipe_id)
        .execute(&pool)
        .await?;
    sqlx::query("INSERT INTO shopping_cart (user_id, recipe_id) VALUES ($1, $2)")
        .bind(reader)
        .bind(recipe_id)
        .execute(&pool)
        .await?;

    let duplicate = sqlx::query("INSERT INTO favorites (user_id, recipe_id) VALUES ($1, $2)")
        .bind(reader)
        .bind(recipe_id)
        .execute(&pool)
        .await;
    let duplicate = common::error::DatabaseError::from(duplicate.unwrap_err());
    assert!(duplicate.is_unique_violation());

    sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(recipe_id)
        .execute(&pool)
        .await?;

    let remaining: i64 = sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM favorites WHERE recipe_id = $1) + (SELECT COUNT(*) FROM shopping_cart WHERE recipe_id = $1)",
    )
    .bind(recipe_id)
    .fetch_one(&pool)
    .await?;
    assert_eq!(remaining, 0);

    let self_follow = sqlx::query("INSERT INTO subscriptions (user_id, author_id) VALUES ($1, $1)")
        .bind(reader)
        .execute(&pool)
        .await;
    assert!(self_follow.is_err());

    Ok(())
}
