//! User profile lookups

use common::error::DatabaseResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::UserProfile;

/// Profile columns; `$1` is the viewer, `is_subscribed` is false when NULL
pub(crate) const PROFILE_COLUMNS: &str = r#"
    u.id, u.email, u.username, u.first_name, u.last_name,
    EXISTS (SELECT 1 FROM subscriptions s WHERE s.user_id = $1 AND s.author_id = u.id) AS is_subscribed
"#;

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID, as seen by `viewer`
    pub async fn find_profile(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> DatabaseResult<Option<UserProfile>> {
        find_profile(&self.pool, id, viewer).await
    }
}

pub(crate) async fn find_profile(
    pool: &PgPool,
    id: Uuid,
    viewer: Option<Uuid>,
) -> DatabaseResult<Option<UserProfile>> {
    let sql = format!("SELECT {} FROM users u WHERE u.id = $2", PROFILE_COLUMNS);

    let profile = sqlx::query_as::<_, UserProfile>(&sql)
        .bind(viewer)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(profile)
}
