use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod jwt;
mod models;
mod password;
mod repositories;
mod routes;
mod validation;

use common::database::{DatabaseConfig, health_check, init_pool, prepare_db};

use crate::{
    jwt::{JwtConfig, JwtService},
    repositories::UserRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repository: UserRepository,
    pub jwt_service: JwtService,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    prepare_db(&pool).await?;

    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;

    let app_state = AppState {
        user_repository: UserRepository::new(pool),
        jwt_service,
    };

    let app = routes::create_router(app_state);

    let bind_address =
        std::env::var("AUTH_BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Authentication service listening on {}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
