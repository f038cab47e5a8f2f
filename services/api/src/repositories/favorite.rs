use common::error::DatabaseResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{membership::Membership, models::RecipeSummary};

use super::recipe::find_summary;

#[derive(Clone)]
pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Membership for FavoriteRepository {
    type Target = RecipeSummary;
    type Options = ();

    const TARGET: &'static str = "Recipe";
    const COLLECTION: &'static str = "favorites";

    async fn find_target(&self, recipe_id: Uuid) -> DatabaseResult<Option<RecipeSummary>> {
        find_summary(&self.pool, recipe_id).await
    }

    async fn contains(&self, user_id: Uuid, recipe_id: Uuid) -> DatabaseResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND recipe_id = $2)",
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, user_id: Uuid, recipe_id: Uuid, _: ()) -> DatabaseResult<()> {
        sqlx::query("INSERT INTO favorites (user_id, recipe_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(recipe_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn remove(&self, user_id: Uuid, recipe_id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND recipe_id = $2")
            .bind(user_id)
            .bind(recipe_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
