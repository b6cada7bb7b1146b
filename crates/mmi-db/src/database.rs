use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;

use crate::{collection::PgCollection, config::DatabaseConfig, Error, Result};

/// Process-wide connection pool. Open it once with [`Database::connect`],
/// hand out collections, and [`Database::close`] it before exiting.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Postgres>,
}

impl Database {
    /// Create new database connection
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        tracing::debug!("Connected to database");
        Ok(Self { pool })
    }

    /// Open a collection, creating its table and indexes on first use
    pub async fn collection(&self, name: &str) -> Result<PgCollection> {
        let collection = PgCollection::new(self.pool.clone(), name)?;
        collection.ensure_schema().await?;
        Ok(collection)
    }

    /// Close every pooled connection
    pub async fn close(self) {
        self.pool.close().await;
        tracing::debug!("Database connections closed");
    }
}
