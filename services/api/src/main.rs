use anyhow::Result;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod catalog;
mod config;
mod error;
mod extract;
mod middleware;
mod models;
mod ownership;
mod repositories;
mod routes;
mod services;
mod state;
mod validation;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, init_pool, run_migrations},
    jwt::{JwtConfig, JwtService},
};
use tokio::net::TcpListener;

use crate::{catalog::CatalogClient, config::ServerConfig, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting API service");

    let config = ServerConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;

    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;

    // Redis only backs the catalog cache, so a bad URL is not fatal
    let cache = match RedisConfig::from_env() {
        Some(redis_config) => match RedisPool::new(&redis_config) {
            Ok(pool) => {
                info!("Catalog cache enabled");
                Some(pool)
            }
            Err(e) => {
                warn!(error = %e, "Catalog cache disabled");
                None
            }
        },
        None => None,
    };

    let catalog = CatalogClient::new(&config.pokeapi_url, cache, config.catalog_cache_ttl)?;

    let app_state = AppState::with_pool(pool, jwt_service, catalog);

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state).layer(cors_layer(&config)?);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(config: &ServerConfig) -> Result<CorsLayer> {
    let origins = config
        .cors_origins()
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}
