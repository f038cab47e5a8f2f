//! User profiles and subscriptions

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::{Query, WithRejection};
use serde::Deserialize;
use uuid::Uuid;

use super::{PathParam, QueryParams};
use crate::{
    error::{ApiError, ApiResult},
    membership,
    middleware::AuthUser,
    models::{AuthorWithRecipes, SubscriptionsQuery, UserProfile},
    pagination::{Page, Paginated},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct SubscribeQuery {
    pub recipes_limit: Option<u32>,
}

/// Profile of the caller
pub async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<UserProfile>> {
    let profile = state
        .users
        .find_profile(user.id, Some(user.id))
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(profile))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    WithRejection(Path(id), _): PathParam<Uuid>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state
        .users
        .find_profile(id, user.map(|u| u.id))
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(profile))
}

/// Authors the caller follows, with their latest recipes
pub async fn list_subscriptions(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Query(query), _): QueryParams<SubscriptionsQuery>,
) -> ApiResult<Json<Paginated<AuthorWithRecipes>>> {
    let page = Page::new(query.page, query.limit, &state.config);

    let (authors, total) = state
        .subscriptions
        .list(user.id, page, query.recipes_limit)
        .await?;

    Ok(Json(Paginated::new(authors, total, page)))
}

pub async fn subscribe(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(author_id), _): PathParam<Uuid>,
    WithRejection(Query(query), _): QueryParams<SubscribeQuery>,
) -> ApiResult<impl IntoResponse> {
    // Read the embedded recipes first so a failure here leaves no subscription behind.
    let (mut recipes, mut counts) = state
        .subscriptions
        .recipes_by_author(&[author_id], query.recipes_limit)
        .await?;

    let mut profile = membership::add(&state.subscriptions, user.id, author_id, ()).await?;
    profile.is_subscribed = true;

    let author = AuthorWithRecipes {
        recipes: recipes.remove(&author_id).unwrap_or_default(),
        recipes_count: counts.remove(&author_id).unwrap_or_default(),
        profile,
    };

    Ok((StatusCode::CREATED, Json(author)))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(author_id), _): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    membership::remove(&state.subscriptions, user.id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
