//! Ingredient catalogue repository

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{Ingredient, NewIngredient};

/// Turn user input into a `LIKE` prefix pattern, escaping wildcards
pub fn like_prefix(input: &str) -> String {
    let mut pattern = String::with_capacity(input.len() + 1);
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct IngredientRepository {
    pool: PgPool,
}

impl IngredientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List ingredients, optionally only those whose name starts with `prefix`
    pub async fn list(&self, prefix: Option<&str>) -> DatabaseResult<Vec<Ingredient>> {
        let ingredients = match prefix.filter(|p| !p.is_empty()) {
            Some(prefix) => {
                sqlx::query_as::<_, Ingredient>(
                    r#"
                    SELECT id, name, measurement_unit
                    FROM ingredients
                    WHERE LOWER(name) LIKE LOWER($1)
                    ORDER BY name
                    "#,
                )
                .bind(like_prefix(prefix))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Ingredient>(
                    "SELECT id, name, measurement_unit FROM ingredients ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(ingredients)
    }

    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Ingredient>> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, measurement_unit FROM ingredients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ingredient)
    }

    /// Load the catalogue into an empty table; returns the number of rows added
    pub async fn import(&self, catalogue: &[NewIngredient]) -> DatabaseResult<u64> {
        let names: Vec<&str> = catalogue.iter().map(|i| i.name.as_str()).collect();
        let units: Vec<&str> = catalogue
            .iter()
            .map(|i| i.measurement_unit.as_str())
            .collect();

        let result = sqlx::query(
            r#"
            INSERT INTO ingredients (name, measurement_unit)
            SELECT name, measurement_unit
            FROM UNNEST($1::TEXT[], $2::TEXT[]) AS t(name, measurement_unit)
            WHERE NOT EXISTS (SELECT 1 FROM ingredients)
            "#,
        )
        .bind(&names)
        .bind(&units)
        .execute(&self.pool)
        .await?;

        info!("Imported {} ingredients", result.rows_affected());
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_prefix_plain() {
        assert_eq!(like_prefix("mil"), "mil%");
        assert_eq!(like_prefix("Сах"), "Сах%");
    }

    #[test]
    fn test_like_prefix_escapes_wildcards() {
        assert_eq!(like_prefix("100%"), "100\\%%");
        assert_eq!(like_prefix("a_b"), "a\\_b%");
        assert_eq!(like_prefix("c:\\"), "c:\\\\%");
    }
}
