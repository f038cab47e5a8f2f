use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod membership;
mod middleware;
mod models;
mod pagination;
mod repositories;
mod routes;
mod shopping_list;
mod state;
mod validation;

use common::{
    database::{DatabaseConfig, health_check, init_pool, prepare_db},
    token::TokenVerifier,
};

use crate::{
    config::ApiConfig, models::NewIngredient, repositories::IngredientRepository,
    state::AppState,
};

/// Import the ingredient catalogue if one is configured and the table is empty
async fn import_ingredients(config: &ApiConfig, repository: &IngredientRepository) -> Result<()> {
    let Some(path) = &config.ingredients_file else {
        return Ok(());
    };

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read ingredients file {}", path))?;
    let catalogue: Vec<NewIngredient> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse ingredients file {}", path))?;

    let imported = repository.import(&catalogue).await?;
    if imported == 0 {
        info!("Ingredient table already populated, skipping import");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

    let config = ApiConfig::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    prepare_db(&pool).await?;

    let verifier = TokenVerifier::from_env()?;
    let app_state = AppState::new(pool, config.clone(), verifier);

    import_ingredients(&config, &app_state.ingredients).await?;

    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("API service listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
