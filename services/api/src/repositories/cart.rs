//! Shopping cart storage and the aggregation query behind the shopping list

use common::error::DatabaseResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    membership::Membership,
    models::RecipeSummary,
    shopping_list::{ShoppingList, ShoppingListItem},
};

use super::recipe::find_summary;

#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Sum ingredient amounts over every recipe in the user's cart
    ///
    /// Lines are ordered by first appearance: cart entries in the order they
    /// were added, then each recipe's ingredients in their stored order.
    pub async fn shopping_list(&self, user_id: Uuid) -> DatabaseResult<ShoppingList> {
        let items = sqlx::query_as::<_, ShoppingListItem>(
            r#"
            WITH lines AS (
                SELECT
                    i.name,
                    i.measurement_unit,
                    ri.amount::BIGINT * c.quantity AS amount,
                    ROW_NUMBER() OVER (ORDER BY c.added_at, c.recipe_id, ri.position) AS seen
                FROM shopping_cart c
                JOIN recipe_ingredients ri ON ri.recipe_id = c.recipe_id
                JOIN ingredients i ON i.id = ri.ingredient_id
                WHERE c.user_id = $1
            )
            SELECT name, measurement_unit, SUM(amount)::BIGINT AS total_amount
            FROM lines
            GROUP BY name, measurement_unit
            ORDER BY MIN(seen)
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ShoppingList::from_items(items))
    }
}

impl Membership for CartRepository {
    type Target = RecipeSummary;
    /// Quantity multiplier
    type Options = i32;

    const TARGET: &'static str = "Recipe";
    const COLLECTION: &'static str = "shopping cart";

    async fn find_target(&self, recipe_id: Uuid) -> DatabaseResult<Option<RecipeSummary>> {
        find_summary(&self.pool, recipe_id).await
    }

    async fn contains(&self, user_id: Uuid, recipe_id: Uuid) -> DatabaseResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM shopping_cart WHERE user_id = $1 AND recipe_id = $2)",
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, user_id: Uuid, recipe_id: Uuid, quantity: i32) -> DatabaseResult<()> {
        sqlx::query("INSERT INTO shopping_cart (user_id, recipe_id, quantity) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(recipe_id)
            .bind(quantity)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn remove(&self, user_id: Uuid, recipe_id: Uuid) -> DatabaseResult<bool> {
        let result =
            sqlx::query("DELETE FROM shopping_cart WHERE user_id = $1 AND recipe_id = $2")
                .bind(user_id)
                .bind(recipe_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
