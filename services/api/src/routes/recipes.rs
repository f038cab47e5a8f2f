//! Recipe CRUD, favorites, cart and the shopping list download

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::{Query, WithRejection};
use serde::Deserialize;
use uuid::Uuid;

use super::{JsonBody, PathParam, QueryParams};
use crate::{
    error::{ApiError, ApiResult},
    membership,
    middleware::AuthUser,
    models::{CreateRecipeRequest, IngredientAmount, Recipe, RecipeQuery, UpdateRecipeRequest},
    pagination::{Page, Paginated},
    state::AppState,
    validation,
};

/// Optional body of a cart add
#[derive(Debug, Deserialize)]
pub struct CartRequest {
    pub quantity: i32,
}

/// List recipes, newest first
pub async fn list_recipes(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    WithRejection(Query(query), _): QueryParams<RecipeQuery>,
) -> ApiResult<Json<Paginated<Recipe>>> {
    let page = Page::new(query.page, query.limit, &state.config);
    let viewer = user.map(|u| u.id);

    let (recipes, total) = state.recipes.list(&query, viewer, page).await?;

    Ok(Json(Paginated::new(recipes, total, page)))
}

/// Get a recipe by ID
pub async fn get_recipe(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    WithRejection(Path(id), _): PathParam<Uuid>,
) -> ApiResult<Json<Recipe>> {
    let recipe = state
        .recipes
        .get(id, user.map(|u| u.id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    Ok(Json(recipe))
}

/// Create a recipe authored by the caller
pub async fn create_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Json(payload), _): JsonBody<CreateRecipeRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_new_recipe(&payload).map_err(ApiError::InvalidState)?;
    check_references(&state, &payload.ingredients, &payload.tags).await?;

    let id = state.recipes.create(user.id, &payload).await?;
    let recipe = state
        .recipes
        .get(id, Some(user.id))
        .await?
        .ok_or(ApiError::InternalServerError)?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// Partially update a recipe owned by the caller
pub async fn update_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(id), _): PathParam<Uuid>,
    WithRejection(Json(payload), _): JsonBody<UpdateRecipeRequest>,
) -> ApiResult<Json<Recipe>> {
    ensure_owner(&state, id, user).await?;

    validation::validate_recipe_update(&payload).map_err(ApiError::InvalidState)?;
    check_references(
        &state,
        payload.ingredients.as_deref().unwrap_or_default(),
        payload.tags.as_deref().unwrap_or_default(),
    )
    .await?;

    state.recipes.update(id, &payload).await?;

    let recipe = state
        .recipes
        .get(id, Some(user.id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    Ok(Json(recipe))
}

/// Delete a recipe owned by the caller
pub async fn delete_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(id), _): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    ensure_owner(&state, id, user).await?;

    if state.recipes.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Recipe not found".to_string()))
    }
}

pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(id), _): PathParam<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let recipe = membership::add(&state.favorites, user.id, id, ()).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(id), _): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    membership::remove(&state.favorites, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Put a recipe in the cart; the body may set a quantity multiplier
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(id), _): PathParam<Uuid>,
    body: Result<Json<CartRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let quantity = match body {
        Ok(Json(body)) => body.quantity,
        // No JSON body at all means a single portion.
        Err(JsonRejection::MissingJsonContentType(_)) => 1,
        Err(rejection) => return Err(rejection.into()),
    };
    if quantity < 1 {
        return Err(ApiError::InvalidState(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let recipe = membership::add(&state.cart, user.id, id, quantity).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(id), _): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    membership::remove(&state.cart, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Aggregated shopping list as a text attachment
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let list = state.cart.shopping_list(user.id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shopping_list.txt\"",
            ),
        ],
        list.render(),
    ))
}

/// 404 when the recipe is missing, 403 when someone else wrote it
async fn ensure_owner(state: &AppState, recipe_id: Uuid, user: AuthUser) -> ApiResult<()> {
    let author = state
        .recipes
        .find_author(recipe_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    if author != user.id {
        return Err(ApiError::Forbidden(
            "Only the author can change this recipe".to_string(),
        ));
    }
    Ok(())
}

async fn check_references(
    state: &AppState,
    ingredients: &[IngredientAmount],
    tags: &[Uuid],
) -> ApiResult<()> {
    let ingredient_ids: Vec<Uuid> = ingredients.iter().map(|i| i.id).collect();

    if let Some(missing) = state
        .recipes
        .missing_ingredients(&ingredient_ids)
        .await?
        .first()
    {
        return Err(ApiError::InvalidState(format!(
            "Ingredient {} does not exist",
            missing
        )));
    }

    if let Some(missing) = state.recipes.missing_tags(tags).await?.first() {
        return Err(ApiError::InvalidState(format!(
            "Tag {} does not exist",
            missing
        )));
    }

    Ok(())
}
