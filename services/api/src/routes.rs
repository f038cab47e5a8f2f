//! API service routes

mod catalog;
mod recipes;
mod users;

use axum::{
    Json, Router,
    extract::Path,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::{Query, WithRejection};
use serde_json::json;

use crate::{error::ApiError, middleware::auth_middleware, state::AppState};

/// Extractors that reject with the usual `{"error": ...}` body
type JsonBody<T> = WithRejection<Json<T>, ApiError>;
type PathParam<T> = WithRejection<Path<T>, ApiError>;
type QueryParams<T> = WithRejection<Query<T>, ApiError>;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/recipes/download_shopping_cart",
            get(recipes::download_shopping_cart),
        )
        .route(
            "/recipes/:id",
            get(recipes::get_recipe)
                .patch(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route(
            "/recipes/:id/favorite",
            post(recipes::add_favorite).delete(recipes::remove_favorite),
        )
        .route(
            "/recipes/:id/shopping_cart",
            post(recipes::add_to_cart).delete(recipes::remove_from_cart),
        )
        .route("/tags", get(catalog::list_tags))
        .route("/tags/:id", get(catalog::get_tag))
        .route("/ingredients", get(catalog::list_ingredients))
        .route("/ingredients/:id", get(catalog::get_ingredient))
        .route("/users/me", get(users::me))
        .route("/users/subscriptions", get(users::list_subscriptions))
        .route("/users/:id", get(users::get_user))
        .route(
            "/users/:id/subscribe",
            post(users::subscribe).delete(users::unsubscribe),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}
