//! Add/remove toggles for (user, target) pairs
//!
//! Favorites, cart entries and subscriptions are all a two-state relation
//! between the caller and a target. The rules for moving between the two
//! states live here once; each repository only supplies storage access.

use std::future::Future;

use common::error::DatabaseResult;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

pub trait Membership {
    /// What an add returns to the caller
    type Target: Send;
    /// Extra data stored with a new row
    type Options: Send;

    /// Target noun used in messages, e.g. "Recipe"
    const TARGET: &'static str;
    /// Collection noun used in messages, e.g. "favorites"
    const COLLECTION: &'static str;

    fn find_target(
        &self,
        target_id: Uuid,
    ) -> impl Future<Output = DatabaseResult<Option<Self::Target>>> + Send;

    fn contains(
        &self,
        user_id: Uuid,
        target_id: Uuid,
    ) -> impl Future<Output = DatabaseResult<bool>> + Send;

    /// Insert the pair. A concurrent duplicate surfaces as a unique violation.
    fn insert(
        &self,
        user_id: Uuid,
        target_id: Uuid,
        options: Self::Options,
    ) -> impl Future<Output = DatabaseResult<()>> + Send;

    /// Delete the pair, returning whether a row was removed
    fn remove(
        &self,
        user_id: Uuid,
        target_id: Uuid,
    ) -> impl Future<Output = DatabaseResult<bool>> + Send;

    /// Reject pairs that may never exist, whatever the current state
    fn admit(&self, _user_id: Uuid, _target_id: Uuid) -> Result<(), String> {
        Ok(())
    }
}

fn already_present<M: Membership>() -> ApiError {
    ApiError::AlreadyExists(format!("{} is already in {}", M::TARGET, M::COLLECTION))
}

/// ABSENT -> PRESENT
pub async fn add<M: Membership>(
    membership: &M,
    user_id: Uuid,
    target_id: Uuid,
    options: M::Options,
) -> ApiResult<M::Target> {
    let target = membership
        .find_target(target_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{} not found", M::TARGET)))?;

    membership
        .admit(user_id, target_id)
        .map_err(ApiError::InvalidState)?;

    if membership.contains(user_id, target_id).await? {
        return Err(already_present::<M>());
    }

    match membership.insert(user_id, target_id, options).await {
        Ok(()) => {
            info!(%user_id, %target_id, "added to {}", M::COLLECTION);
            Ok(target)
        }
        Err(e) if e.is_unique_violation() => Err(already_present::<M>()),
        Err(e) => {
            let mapped = match e.violated_foreign_key() {
                // The caller's account is gone while their token is still valid.
                Some(key) if key.ends_with("_user_id_fkey") => Some(ApiError::Unauthorized),
                // The target was deleted after the lookup above.
                Some(_) => Some(ApiError::NotFound(format!("{} not found", M::TARGET))),
                None => None,
            };
            Err(mapped.unwrap_or_else(|| e.into()))
        }
    }
}

/// PRESENT -> ABSENT
pub async fn remove<M: Membership>(membership: &M, user_id: Uuid, target_id: Uuid) -> ApiResult<()> {
    if membership.remove(user_id, target_id).await? {
        info!(%user_id, %target_id, "removed from {}", M::COLLECTION);
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "{} was not in {}",
            M::TARGET,
            M::COLLECTION
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::DatabaseError;
    use std::{
        collections::HashSet,
        fmt,
        sync::Mutex,
    };

    /// Constraint failure as PostgreSQL would report it
    #[derive(Debug, Clone, Copy)]
    enum Violation {
        Unique,
        ForeignKey(&'static str),
    }

    impl fmt::Display for Violation {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(sqlx::error::DatabaseError::message(self))
        }
    }

    impl std::error::Error for Violation {}

    impl sqlx::error::DatabaseError for Violation {
        fn message(&self) -> &str {
            match self {
                Violation::Unique => "duplicate key value violates unique constraint",
                Violation::ForeignKey(_) => "insert violates foreign key constraint",
            }
        }

        fn constraint(&self) -> Option<&str> {
            match self {
                Violation::Unique => None,
                Violation::ForeignKey(name) => Some(*name),
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            match self {
                Violation::Unique => sqlx::error::ErrorKind::UniqueViolation,
                Violation::ForeignKey(_) => sqlx::error::ErrorKind::ForeignKeyViolation,
            }
        }
    }

    /// In-memory stand-in for a join table
    struct FakeRelation {
        targets: HashSet<Uuid>,
        rows: Mutex<HashSet<(Uuid, Uuid)>>,
        forbid_self: bool,
        /// Fail the insert as if the store rejected the row
        insert_fails_with: Option<Violation>,
    }

    impl FakeRelation {
        fn new(targets: &[Uuid]) -> Self {
            Self {
                targets: targets.iter().copied().collect(),
                rows: Mutex::new(HashSet::new()),
                forbid_self: false,
                insert_fails_with: None,
            }
        }

        fn rows(&self) -> HashSet<(Uuid, Uuid)> {
            self.rows.lock().unwrap().clone()
        }
    }

    impl Membership for FakeRelation {
        type Target = Uuid;
        type Options = ();

        const TARGET: &'static str = "Recipe";
        const COLLECTION: &'static str = "favorites";

        async fn find_target(&self, target_id: Uuid) -> DatabaseResult<Option<Uuid>> {
            Ok(self.targets.get(&target_id).copied())
        }

        async fn contains(&self, user_id: Uuid, target_id: Uuid) -> DatabaseResult<bool> {
            Ok(self.rows.lock().unwrap().contains(&(user_id, target_id)))
        }

        async fn insert(&self, user_id: Uuid, target_id: Uuid, _: ()) -> DatabaseResult<()> {
            if let Some(violation) = self.insert_fails_with {
                return Err(DatabaseError::from(sqlx::Error::Database(Box::new(
                    violation,
                ))));
            }
            self.rows.lock().unwrap().insert((user_id, target_id));
            Ok(())
        }

        async fn remove(&self, user_id: Uuid, target_id: Uuid) -> DatabaseResult<bool> {
            Ok(self.rows.lock().unwrap().remove(&(user_id, target_id)))
        }

        fn admit(&self, user_id: Uuid, target_id: Uuid) -> Result<(), String> {
            if self.forbid_self && user_id == target_id {
                return Err("You cannot subscribe to yourself".to_string());
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_add_then_duplicate_add() {
        let user = Uuid::new_v4();
        let recipe = Uuid::new_v4();
        let relation = FakeRelation::new(&[recipe]);

        assert_eq!(add(&relation, user, recipe, ()).await.unwrap(), recipe);
        let before = relation.rows();

        let second = add(&relation, user, recipe, ()).await;
        assert!(matches!(second, Err(ApiError::AlreadyExists(_))));
        assert_eq!(relation.rows(), before);
    }

    #[tokio::test]
    async fn test_add_missing_target_is_not_found() {
        let relation = FakeRelation::new(&[]);

        let result = add(&relation, Uuid::new_v4(), Uuid::new_v4(), ()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert!(relation.rows().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_pair_is_client_error() {
        let recipe = Uuid::new_v4();
        let relation = FakeRelation::new(&[recipe]);

        let result = remove(&relation, Uuid::new_v4(), recipe).await;
        match result {
            Err(e @ ApiError::BadRequest(_)) => {
                assert_eq!(e.to_string(), "Bad request: Recipe was not in favorites")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(relation.rows().is_empty());
    }

    #[tokio::test]
    async fn test_add_remove_cycle() {
        let user = Uuid::new_v4();
        let recipe = Uuid::new_v4();
        let relation = FakeRelation::new(&[recipe]);

        add(&relation, user, recipe, ()).await.unwrap();
        remove(&relation, user, recipe).await.unwrap();
        assert!(relation.rows().is_empty());

        add(&relation, user, recipe, ()).await.unwrap();
        assert_eq!(relation.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_self_pair_always_rejected() {
        let user = Uuid::new_v4();
        let mut relation = FakeRelation::new(&[user]);
        relation.forbid_self = true;

        let result = add(&relation, user, user, ()).await;
        assert!(matches!(result, Err(ApiError::InvalidState(_))));

        // Even if a row somehow exists, the answer does not change.
        relation.rows.lock().unwrap().insert((user, user));
        let result = add(&relation, user, user, ()).await;
        assert!(matches!(result, Err(ApiError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_unique_violation_reads_as_already_exists() {
        let recipe = Uuid::new_v4();
        let mut relation = FakeRelation::new(&[recipe]);
        // Another request inserted the row between the check and the insert.
        relation.insert_fails_with = Some(Violation::Unique);

        let result = add(&relation, Uuid::new_v4(), recipe, ()).await;
        assert!(matches!(result, Err(ApiError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_deleted_caller_account_is_unauthorized() {
        let recipe = Uuid::new_v4();
        let mut relation = FakeRelation::new(&[recipe]);
        relation.insert_fails_with = Some(Violation::ForeignKey("favorites_user_id_fkey"));

        let result = add(&relation, Uuid::new_v4(), recipe, ()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_target_deleted_before_insert_is_not_found() {
        let recipe = Uuid::new_v4();
        let mut relation = FakeRelation::new(&[recipe]);
        relation.insert_fails_with = Some(Violation::ForeignKey("favorites_recipe_id_fkey"));

        let result = add(&relation, Uuid::new_v4(), recipe, ()).await;
        match result {
            Err(e @ ApiError::NotFound(_)) => {
                assert_eq!(e.to_string(), "Not found: Recipe not found")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
