pub mod config;
pub mod gate;
pub mod operations;
pub mod schema;

use std::future::Future;
use std::time::Duration;

use sqlx::any::AnyPoolOptions;
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyConnection, AnyPool, Connection};
use thiserror::Error;

use crate::db::config::{DbBackend, DbConfig, DbConfigError};

/// Pooled database handle shared by every request handler.
#[derive(Clone)]
pub struct Database {
    config: DbConfig,
    pool: AnyPool,
}

impl Database {
    /// Builds the pool without opening a connection; reachability is the
    /// gate's job.
    pub fn connect_lazy(config: DbConfig) -> Result<Self, DbInitError> {
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .connect_lazy(&config.url)?;

        tracing::debug!(
            backend = config.backend.as_str(),
            max_connections = config.pool.max_connections,
            "database pool created"
        );

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn backend(&self) -> DbBackend {
        self.config.backend
    }

    /// Checks out one connection; it returns to the pool when dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<Any>, DbError> {
        Ok(self.pool.acquire().await?)
    }

    /// Opens a fresh connection outside the pool, pings it and closes it, so
    /// a failure carries the driver's error rather than a pool timeout.
    pub async fn probe(&self) -> Result<(), DbError> {
        let limit = self.config.pool.acquire_timeout;
        let attempt = async {
            let mut conn = AnyConnection::connect(&self.config.url).await?;
            conn.ping().await?;
            conn.close().await?;
            Ok::<(), sqlx::Error>(())
        };

        match tokio::time::timeout(limit, attempt).await {
            Ok(result) => result.map_err(DbError::from),
            Err(_) => Err(DbError::ConnectTimeout(limit)),
        }
    }

    /// Runs a statement future under the configured statement timeout.
    pub async fn bounded<T, F>(&self, fut: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let limit = self.config.pool.statement_timeout;
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result.map_err(DbError::from),
            Err(_) => Err(DbError::Timeout(limit)),
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error(transparent)]
    Config(#[from] DbConfigError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("statement timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection attempt timed out after {0:?}")]
    ConnectTimeout(Duration),
}
