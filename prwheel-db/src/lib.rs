//! SQLite persistence for prwheel
//!
//! Implements the `prwheel-core` store traits over a `sqlx` SQLite pool.
//! Every multi-row write (pull-request creation, team creation, the
//! deactivation cascade) runs inside one transaction, and the reviewer
//! swap is a compare-and-swap on the junction row.

pub mod error;
pub mod repos;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use prwheel_core::{Error, Result};

pub use repos::{PrRepo, StatsRepo, TeamRepo, UserRepo};

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open or create the database at a file path and run migrations.
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("failed to create database directory: {e}"))
            })?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))
            .map_err(error::storage)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(error::storage)?;

        Self::migrate(&pool).await?;
        info!(path = %db_path.display(), "database opened");
        Ok(Self { pool })
    }

    /// In-memory database for tests. A single connection keeps every
    /// query on the same in-memory instance.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(error::storage)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(error::storage)?;

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| Error::Storage(format!("migration failed: {e}")))
    }

    /// Default database path (`~/.local/share/prwheel/prwheel.db`)
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| Error::Storage("could not determine home directory".to_string()))?;
        Ok(data_dir.join(".local/share/prwheel/prwheel.db"))
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// User directory repository
    pub fn users(&self) -> UserRepo {
        UserRepo::new(self.pool.clone())
    }

    /// Team repository
    pub fn teams(&self) -> TeamRepo {
        TeamRepo::new(self.pool.clone())
    }

    /// Pull request repository
    pub fn pull_requests(&self) -> PrRepo {
        PrRepo::new(self.pool.clone())
    }

    /// Reviewer stats repository
    pub fn stats(&self) -> StatsRepo {
        StatsRepo::new(self.pool.clone())
    }
}
