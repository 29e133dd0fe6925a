//! SQLite persistence for the hamlog QSO logbook

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod mapping;
pub mod models;
pub mod queries;

pub use models::QsoDb;
pub use queries::QsoQueries;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use hamlog_core::{Config, Error, Qso, QsoId, QsoStore, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

// Re-export SqlitePool for convenience
pub use sqlx::SqlitePool;

/// Database connection pool
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// An in-memory URL gets a single connection that is never recycled,
    /// since the data lives only as long as that connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the database cannot be
    /// opened.
    pub async fn new(config: &Config) -> Result<Self> {
        let url = &config.database.url;
        let in_memory = is_in_memory(url);

        let mut connect =
            SqliteConnectOptions::from_str(url).map_err(|e| Error::Database(e.to_string()))?;
        if !in_memory {
            connect = connect
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal);
        }

        let options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.database.connect_timeout));
        let options = if in_memory {
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .idle_timeout(Duration::from_secs(config.database.idle_timeout))
        };

        let pool = options
            .connect_with(connect)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        info!(in_memory, "Opened QSO database");
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if migrations fail to run.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Migration failed: {e}")))?;

        Ok(())
    }

    /// Health check
    ///
    /// # Errors
    ///
    /// Returns an error if the health check fails.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Health check failed: {e}")))?;

        Ok(())
    }

    /// Number of stored QSOs
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    pub async fn qso_count(&self) -> Result<i64> {
        QsoQueries::count(&self.pool).await
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[async_trait]
impl QsoStore for Database {
    async fn insert(&self, qso: &Qso) -> Result<Qso> {
        let id = QsoQueries::insert(&self.pool, QsoDb::from(qso.clone())).await?;
        debug!(id, "Inserted QSO row");

        Ok(Qso {
            id: Some(id),
            ..qso.clone()
        })
    }

    async fn update(&self, qso: &Qso) -> Result<()> {
        let Some(id) = qso.id else {
            return Err(Error::Database(
                "cannot update a QSO without an id".to_string(),
            ));
        };

        let written = QsoQueries::update(&self.pool, QsoDb::from(qso.clone())).await?;
        if written == 0 {
            return Err(Error::Conflict { id });
        }

        Ok(())
    }

    async fn delete(&self, id: QsoId) -> Result<bool> {
        Ok(QsoQueries::delete(&self.pool, id).await? > 0)
    }

    async fn find_by_id(&self, id: QsoId) -> Result<Option<Qso>> {
        Ok(QsoQueries::find_by_id(&self.pool, id).await?.map(Qso::from))
    }

    async fn exists(&self, id: QsoId) -> Result<bool> {
        QsoQueries::exists(&self.pool, id).await
    }

    fn stream_all(&self) -> BoxStream<'_, Result<Qso>> {
        QsoQueries::stream(&self.pool).map_ok(Qso::from).boxed()
    }
}
