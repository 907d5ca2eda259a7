use std::sync::Arc;

use chrono::Duration;
use tracing_subscriber::EnvFilter;

use showlog_api::{
    api::{create_router, AppState},
    config::{Config, StorageBackend},
    db::{self, MemoryStore, PgStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let session_ttl = Duration::hours(config.session_ttl_hours);

    // Initialize application state against the configured store
    let state = match config.storage {
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
            db::run_migrations(&pool).await?;
            AppState::from_store(Arc::new(PgStore::new(pool)), session_ttl)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            AppState::from_store(Arc::new(MemoryStore::new()), session_ttl)
        }
    };

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, storage = ?config.storage, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
