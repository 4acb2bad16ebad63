//! Estatery back-office API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use estatery_core::AppError;
use estatery_domain::ModuleStructure;
use tracing::info;

use crate::api_config::{ApiConfig, StorageBackend, init_tracing};
use crate::api_services::Repositories;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let repositories = match &config.storage {
        StorageBackend::Memory => {
            info!("using in-memory storage; data is lost on restart");
            Repositories::in_memory()
        }
        StorageBackend::Postgres { database_url } => {
            let pool = api_services::connect_and_migrate(database_url).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }
            Repositories::postgres(pool, ModuleStructure::standard())
        }
    };

    if config.dev_seed {
        dev_seed::run(&repositories).await?;
    }

    let app_state = api_services::build_app_state(repositories, &config);
    let app = api_router::build_router(app_state, &config)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "estatery-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
