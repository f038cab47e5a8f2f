use common::error::DatabaseResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Tag;

#[derive(Clone)]
pub struct TagRepository {
    pool: PgPool,
}

impl TagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> DatabaseResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(tags)
    }

    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Tag>> {
        let tag =
            sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(tag)
    }
}
