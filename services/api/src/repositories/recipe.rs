//! Recipe repository for database operations

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::{
    models::{
        CreateRecipeRequest, IngredientAmount, Recipe, RecipeIngredient, RecipeQuery,
        RecipeSummary, Tag, UpdateRecipeRequest, UserProfile,
    },
    pagination::Page,
};

/// Filters shared by the count and page queries.
///
/// $1 viewer, $2 author, $3 tag slugs, $4 only favorited, $5 only in cart.
const RECIPE_FILTER: &str = r#"
    ($2::UUID IS NULL OR r.author_id = $2)
    AND (
        cardinality($3::TEXT[]) = 0
        OR EXISTS (
            SELECT 1 FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = r.id AND t.slug = ANY($3)
        )
    )
    AND (NOT $4 OR EXISTS (SELECT 1 FROM favorites f WHERE f.user_id = $1 AND f.recipe_id = r.id))
    AND (NOT $5 OR EXISTS (SELECT 1 FROM shopping_cart c WHERE c.user_id = $1 AND c.recipe_id = r.id))
"#;

/// Recipe columns plus author profile and viewer flags; $1 is the viewer
const RECIPE_COLUMNS: &str = r#"
    r.id, r.name, r.image, r.text, r.cooking_time, r.pub_date,
    u.id AS author_id,
    u.email AS author_email,
    u.username AS author_username,
    u.first_name AS author_first_name,
    u.last_name AS author_last_name,
    EXISTS (SELECT 1 FROM subscriptions s WHERE s.user_id = $1 AND s.author_id = r.author_id) AS author_is_subscribed,
    EXISTS (SELECT 1 FROM favorites f WHERE f.user_id = $1 AND f.recipe_id = r.id) AS is_favorited,
    EXISTS (SELECT 1 FROM shopping_cart c WHERE c.user_id = $1 AND c.recipe_id = r.id) AS is_in_shopping_cart
"#;

#[derive(FromRow)]
struct RecipeRow {
    id: Uuid,
    name: String,
    image: String,
    text: String,
    cooking_time: i32,
    pub_date: DateTime<Utc>,
    author_id: Uuid,
    author_email: String,
    author_username: String,
    author_first_name: String,
    author_last_name: String,
    author_is_subscribed: bool,
    is_favorited: bool,
    is_in_shopping_cart: bool,
}

#[derive(FromRow)]
struct RecipeTagRow {
    recipe_id: Uuid,
    #[sqlx(flatten)]
    tag: Tag,
}

#[derive(FromRow)]
struct RecipeIngredientRow {
    recipe_id: Uuid,
    #[sqlx(flatten)]
    ingredient: RecipeIngredient,
}

/// Fetch the short view of a recipe
pub async fn find_summary(pool: &PgPool, id: Uuid) -> DatabaseResult<Option<RecipeSummary>> {
    let summary = sqlx::query_as::<_, RecipeSummary>(
        "SELECT id, name, image, cooking_time FROM recipes WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(summary)
}

/// Recipe repository for database operations
#[derive(Clone)]
pub struct RecipeRepository {
    pool: PgPool,
}

impl RecipeRepository {
    /// Create a new recipe repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Author of a recipe, `None` when the recipe does not exist
    pub async fn find_author(&self, id: Uuid) -> DatabaseResult<Option<Uuid>> {
        let author = sqlx::query_scalar::<_, Uuid>("SELECT author_id FROM recipes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(author)
    }

    /// Get a full recipe as seen by `viewer`
    pub async fn get(&self, id: Uuid, viewer: Option<Uuid>) -> DatabaseResult<Option<Recipe>> {
        let sql = format!(
            "SELECT {} FROM recipes r JOIN users u ON u.id = r.author_id WHERE r.id = $2",
            RECIPE_COLUMNS
        );

        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(viewer)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// List recipes newest first, with the total number of matches
    pub async fn list(
        &self,
        query: &RecipeQuery,
        viewer: Option<Uuid>,
        page: Page,
    ) -> DatabaseResult<(Vec<Recipe>, i64)> {
        let count_sql = format!("SELECT COUNT(*) FROM recipes r WHERE {}", RECIPE_FILTER);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(viewer)
            .bind(query.author)
            .bind(&query.tags)
            .bind(query.only_favorited())
            .bind(query.only_in_shopping_cart())
            .fetch_one(&self.pool)
            .await?;

        let page_sql = format!(
            "SELECT {} FROM recipes r JOIN users u ON u.id = r.author_id WHERE {} \
             ORDER BY r.pub_date DESC LIMIT $6 OFFSET $7",
            RECIPE_COLUMNS, RECIPE_FILTER
        );
        let rows = sqlx::query_as::<_, RecipeRow>(&page_sql)
            .bind(viewer)
            .bind(query.author)
            .bind(&query.tags)
            .bind(query.only_favorited())
            .bind(query.only_in_shopping_cart())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((self.hydrate(rows).await?, total))
    }

    /// Attach tags and ingredients to recipe rows, keeping row order
    async fn hydrate(&self, rows: Vec<RecipeRow>) -> DatabaseResult<Vec<Recipe>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

        let tag_rows = sqlx::query_as::<_, RecipeTagRow>(
            r#"
            SELECT rt.recipe_id, t.id, t.name, t.color, t.slug
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let ingredient_rows = sqlx::query_as::<_, RecipeIngredientRow>(
            r#"
            SELECT ri.recipe_id, i.id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ANY($1)
            ORDER BY ri.position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut tags: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for row in tag_rows {
            tags.entry(row.recipe_id).or_default().push(row.tag);
        }

        let mut ingredients: HashMap<Uuid, Vec<RecipeIngredient>> = HashMap::new();
        for row in ingredient_rows {
            ingredients
                .entry(row.recipe_id)
                .or_default()
                .push(row.ingredient);
        }

        let recipes = rows
            .into_iter()
            .map(|row| Recipe {
                id: row.id,
                tags: tags.remove(&row.id).unwrap_or_default(),
                author: UserProfile {
                    id: row.author_id,
                    email: row.author_email,
                    username: row.author_username,
                    first_name: row.author_first_name,
                    last_name: row.author_last_name,
                    is_subscribed: row.author_is_subscribed,
                },
                ingredients: ingredients.remove(&row.id).unwrap_or_default(),
                is_favorited: row.is_favorited,
                is_in_shopping_cart: row.is_in_shopping_cart,
                name: row.name,
                image: row.image,
                text: row.text,
                cooking_time: row.cooking_time,
                pub_date: row.pub_date,
            })
            .collect();

        Ok(recipes)
    }

    /// Ingredient ids from `ids` that do not exist
    pub async fn missing_ingredients(&self, ids: &[Uuid]) -> DatabaseResult<Vec<Uuid>> {
        missing_ids(&self.pool, "ingredients", ids).await
    }

    /// Tag ids from `ids` that do not exist
    pub async fn missing_tags(&self, ids: &[Uuid]) -> DatabaseResult<Vec<Uuid>> {
        missing_ids(&self.pool, "tags", ids).await
    }

    /// Create a recipe with its ingredients and tags in one transaction
    pub async fn create(
        &self,
        author_id: Uuid,
        payload: &CreateRecipeRequest,
    ) -> DatabaseResult<Uuid> {
        let mut tx = self.pool.begin().await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO recipes (author_id, name, image, text, cooking_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(author_id)
        .bind(payload.name.trim())
        .bind(&payload.image)
        .bind(&payload.text)
        .bind(payload.cooking_time)
        .fetch_one(&mut *tx)
        .await?;

        replace_ingredients(&mut tx, id, &payload.ingredients).await?;
        replace_tags(&mut tx, id, &payload.tags).await?;

        tx.commit().await?;

        info!("Created recipe {} by {}", id, author_id);
        Ok(id)
    }

    /// Apply a partial update in one transaction
    pub async fn update(&self, id: Uuid, payload: &UpdateRecipeRequest) -> DatabaseResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE recipes
            SET name = COALESCE($2, name),
                image = COALESCE($3, image),
                text = COALESCE($4, text),
                cooking_time = COALESCE($5, cooking_time)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(payload.name.as_deref().map(str::trim))
        .bind(payload.image.as_deref())
        .bind(payload.text.as_deref())
        .bind(payload.cooking_time)
        .execute(&mut *tx)
        .await?;

        if let Some(ingredients) = &payload.ingredients {
            replace_ingredients(&mut tx, id, ingredients).await?;
        }

        if let Some(tags) = &payload.tags {
            replace_tags(&mut tx, id, tags).await?;
        }

        tx.commit().await?;

        info!("Updated recipe {}", id);
        Ok(())
    }

    /// Delete a recipe; join rows go with it through `ON DELETE CASCADE`
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            info!("Deleted recipe {}", id);
        }
        Ok(result.rows_affected() > 0)
    }
}

async fn missing_ids(pool: &PgPool, table: &str, ids: &[Uuid]) -> DatabaseResult<Vec<Uuid>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    // `table` is one of our own table names, never user input.
    let sql = format!(
        "SELECT requested.id FROM UNNEST($1::UUID[]) AS requested(id) \
         WHERE NOT EXISTS (SELECT 1 FROM {} t WHERE t.id = requested.id)",
        table
    );

    let missing = sqlx::query_scalar::<_, Uuid>(&sql)
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(missing)
}

async fn replace_ingredients(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    ingredients: &[IngredientAmount],
) -> DatabaseResult<()> {
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    let ids: Vec<Uuid> = ingredients.iter().map(|i| i.id).collect();
    let amounts: Vec<i32> = ingredients.iter().map(|i| i.amount).collect();
    let positions: Vec<i32> = (0..ingredients.len() as i32).collect();

    sqlx::query(
        r#"
        INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount, position)
        SELECT $1, ingredient_id, amount, position
        FROM UNNEST($2::UUID[], $3::INTEGER[], $4::INTEGER[]) AS t(ingredient_id, amount, position)
        "#,
    )
    .bind(recipe_id)
    .bind(&ids)
    .bind(&amounts)
    .bind(&positions)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn replace_tags(conn: &mut PgConnection, recipe_id: Uuid, tags: &[Uuid]) -> DatabaseResult<()> {
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO recipe_tags (recipe_id, tag_id)
        SELECT $1, tag_id FROM UNNEST($2::UUID[]) AS t(tag_id)
        "#,
    )
    .bind(recipe_id)
    .bind(tags)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
