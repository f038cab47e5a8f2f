use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    /// HEX colour code, e.g. `#E26C2D`
    pub color: String,
    pub slug: String,
}
