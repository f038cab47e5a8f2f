//! Read-only tags and ingredients

use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::{Query, WithRejection};
use uuid::Uuid;

use super::{PathParam, QueryParams};
use crate::{
    error::{ApiError, ApiResult},
    models::{Ingredient, IngredientQuery, Tag},
    state::AppState,
};

pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(state.tags.list().await?))
}

pub async fn get_tag(
    State(state): State<AppState>,
    WithRejection(Path(id), _): PathParam<Uuid>,
) -> ApiResult<Json<Tag>> {
    let tag = state
        .tags
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;

    Ok(Json(tag))
}

/// List ingredients, filtered by case-insensitive name prefix
pub async fn list_ingredients(
    State(state): State<AppState>,
    WithRejection(Query(query), _): QueryParams<IngredientQuery>,
) -> ApiResult<Json<Vec<Ingredient>>> {
    let ingredients = state.ingredients.list(query.name.as_deref()).await?;
    Ok(Json(ingredients))
}

pub async fn get_ingredient(
    State(state): State<AppState>,
    WithRejection(Path(id), _): PathParam<Uuid>,
) -> ApiResult<Json<Ingredient>> {
    let ingredient = state
        .ingredients
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ingredient not found".to_string()))?;

    Ok(Json(ingredient))
}
