use std::sync::Arc;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use super::memory::MemoryCatalogueStore;
use super::postgres::PgCatalogueStore;
use super::store::CatalogueStore;
use crate::config::{DatabaseConfig, StoreBackend};

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Schema for the catalogue tables. Idempotent, safe to run on every start.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS games (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL CHECK (length(btrim(title)) > 0),
        rating INTEGER NOT NULL,
        completed BOOLEAN NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL CHECK (length(btrim(name)) > 0),
        fighting INTEGER NOT NULL,
        intelligence INTEGER NOT NULL,
        good BOOLEAN NOT NULL,
        game_id INTEGER REFERENCES games (id) ON DELETE SET NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS characters_game_id_idx ON characters (game_id)",
];

/// Connection and schema management for the catalogue database
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool against `DATABASE_URL`
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool for: {}", Self::redacted_url(url)?);
        Ok(pool)
    }

    /// Create the catalogue tables if they do not exist
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        info!("Catalogue schema is up to date");
        Ok(())
    }

    /// Build the configured store, running migrations when enabled
    pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn CatalogueStore>, DatabaseError> {
        match config.backend {
            StoreBackend::Memory => {
                info!("Using in-memory catalogue store; data is lost on exit");
                Ok(MemoryCatalogueStore::new_shared())
            }
            StoreBackend::Postgres => {
                let pool = Self::connect(config).await?;
                if config.auto_migrate {
                    Self::migrate(&pool).await?;
                }
                Ok(Arc::new(PgCatalogueStore::new(pool)))
            }
        }
    }

    /// Connection URL with the password removed, for logging
    fn redacted_url(url: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("***"))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
