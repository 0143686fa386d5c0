use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderValue;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod clock;
mod config;
mod error;
mod models;
mod repositories;
mod routes;
mod services;
mod state;

use common::database::{DatabaseConfig, init_pool, run_migrations};

use crate::{
    clock::DefaultClock,
    config::{ApiConfig, StorageBackend},
    repositories::{MemoryRepository, PgRepository, Repository},
    services::Services,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting appointments API service");

    let config = ApiConfig::from_env()?;

    let (repository, db_pool) = match config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if common::database::health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            if config.run_migrations {
                run_migrations(&pool).await?;
            }

            let repository: Arc<dyn Repository> = Arc::new(PgRepository::new(pool.clone()));
            (repository, Some(pool))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; records are lost on shutdown");
            let repository: Arc<dyn Repository> = Arc::new(MemoryRepository::new());
            (repository, None)
        }
    };

    let services = Services::new(repository, Arc::new(DefaultClock));

    let app_state = AppState {
        db_pool,
        appointment_service: services.appointments,
        user_service: services.users,
    };

    let cors = CorsLayer::new()
        .allow_origin(config.cors_allowed_origin.parse::<HeaderValue>()?)
        .allow_methods(Any)
        .allow_headers(Any);

    // Start the web server
    let app = routes::create_router(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Appointments API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
