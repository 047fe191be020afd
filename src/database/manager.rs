use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::error::{StoreError, StoreResult};
use super::memory::MemoryStore;
use super::postgres::PgStore;
use super::store::Store;
use crate::config::{DatabaseConfig, StoreBackend};

/// Builds the configured `Store` for the server process
pub struct DatabaseManager;

impl DatabaseManager {
    /// Opens the store selected by `database.backend`, running migrations
    /// first when the config asks for it.
    pub async fn open(config: &DatabaseConfig) -> StoreResult<Arc<dyn Store>> {
        match config.backend {
            StoreBackend::Memory => {
                info!("Using in-memory store; data is lost on shutdown");
                Ok(Arc::new(MemoryStore::new()))
            }
            StoreBackend::Postgres => {
                let store = PgStore::new(Self::connect(config).await?);
                if config.run_migrations {
                    store.migrate().await?;
                }
                Ok(Arc::new(store))
            }
        }
    }

    /// Creates the Postgres pool from `database.url`
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<sqlx::PgPool> {
        let url = config
            .url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool ({} max connections)", config.max_connections);
        Ok(pool)
    }
}
