//! Subscriptions between users and the authors they follow

use std::collections::HashMap;

use common::error::DatabaseResult;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    membership::Membership,
    models::{AuthorWithRecipes, RecipeSummary, UserProfile},
    pagination::Page,
};

use super::user::{PROFILE_COLUMNS, find_profile};

#[derive(FromRow)]
struct AuthorRecipeRow {
    author_id: Uuid,
    #[sqlx(flatten)]
    recipe: RecipeSummary,
}

#[derive(FromRow)]
struct AuthorCountRow {
    author_id: Uuid,
    recipes_count: i64,
}

#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Authors `user_id` follows, most recent subscription first
    pub async fn list(
        &self,
        user_id: Uuid,
        page: Page,
        recipes_limit: Option<u32>,
    ) -> DatabaseResult<(Vec<AuthorWithRecipes>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM subscriptions sub JOIN users u ON u.id = sub.author_id \
             WHERE sub.user_id = $1 ORDER BY sub.created_at DESC LIMIT $2 OFFSET $3",
            PROFILE_COLUMNS
        );
        let authors = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(user_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let author_ids: Vec<Uuid> = authors.iter().map(|a| a.id).collect();
        let (mut recipes, mut counts) = self.recipes_by_author(&author_ids, recipes_limit).await?;

        let results = authors
            .into_iter()
            .map(|profile| AuthorWithRecipes {
                recipes: recipes.remove(&profile.id).unwrap_or_default(),
                recipes_count: counts.remove(&profile.id).unwrap_or_default(),
                profile,
            })
            .collect();

        Ok((results, total))
    }

    /// Newest recipes of each author, at most `limit` each, plus their totals
    pub async fn recipes_by_author(
        &self,
        author_ids: &[Uuid],
        limit: Option<u32>,
    ) -> DatabaseResult<(HashMap<Uuid, Vec<RecipeSummary>>, HashMap<Uuid, i64>)> {
        if author_ids.is_empty() {
            return Ok((HashMap::new(), HashMap::new()));
        }

        let rows = sqlx::query_as::<_, AuthorRecipeRow>(
            r#"
            SELECT author_id, id, name, image, cooking_time
            FROM (
                SELECT r.*, ROW_NUMBER() OVER (PARTITION BY r.author_id ORDER BY r.pub_date DESC) AS n
                FROM recipes r
                WHERE r.author_id = ANY($1)
            ) ranked
            WHERE $2::BIGINT IS NULL OR n <= $2
            ORDER BY author_id, n
            "#,
        )
        .bind(author_ids)
        .bind(limit.map(i64::from))
        .fetch_all(&self.pool)
        .await?;

        let count_rows = sqlx::query_as::<_, AuthorCountRow>(
            r#"
            SELECT author_id, COUNT(*) AS recipes_count
            FROM recipes
            WHERE author_id = ANY($1)
            GROUP BY author_id
            "#,
        )
        .bind(author_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut recipes: HashMap<Uuid, Vec<RecipeSummary>> = HashMap::new();
        for row in rows {
            recipes.entry(row.author_id).or_default().push(row.recipe);
        }

        let counts = count_rows
            .into_iter()
            .map(|row| (row.author_id, row.recipes_count))
            .collect();

        Ok((recipes, counts))
    }
}

impl Membership for SubscriptionRepository {
    type Target = UserProfile;
    type Options = ();

    const TARGET: &'static str = "Author";
    const COLLECTION: &'static str = "subscriptions";

    async fn find_target(&self, author_id: Uuid) -> DatabaseResult<Option<UserProfile>> {
        find_profile(&self.pool, author_id, None).await
    }

    async fn contains(&self, user_id: Uuid, author_id: Uuid) -> DatabaseResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM subscriptions WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, user_id: Uuid, author_id: Uuid, _: ()) -> DatabaseResult<()> {
        sqlx::query("INSERT INTO subscriptions (user_id, author_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn remove(&self, user_id: Uuid, author_id: Uuid) -> DatabaseResult<bool> {
        let result =
            sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
                .bind(user_id)
                .bind(author_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    fn admit(&self, user_id: Uuid, author_id: Uuid) -> Result<(), String> {
        if user_id == author_id {
            return Err("You cannot subscribe to yourself".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_self_subscription_is_not_admitted() {
        let pool = PgPool::connect_lazy("postgresql://localhost/foodgram").unwrap();
        let repository = SubscriptionRepository::new(pool);
        let user = Uuid::new_v4();

        assert!(repository.admit(user, user).is_err());
        assert!(repository.admit(user, Uuid::new_v4()).is_ok());
    }
}
