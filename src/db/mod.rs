//! Persistence layer.
//!
//! The relational schema lives in `migrations/` and is embedded into the binary
//! with `sqlx::migrate!`. Every connection is opened with foreign keys enforced,
//! which is what makes `DELETE FROM users` cascade to the owner's tasks.
//!
//! Query functions in [`users`] and [`tasks`] take `&mut SqliteConnection`, so a
//! pooled connection and an open transaction can be passed interchangeably.

pub mod tasks;
pub mod users;

use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::migrate::Migrator;
use std::str::FromStr;
use std::time::Duration;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens a pool for `database_url`, creating the database file if needed.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    info!("Creating database connection pool for {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await?;

    health_check(&pool).await?;
    Ok(pool)
}

/// Opens a single-connection in-memory database.
///
/// The connection is never recycled, so the data lives as long as the pool does.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Applies every pending migration.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");
    MIGRATOR.run(pool).await?;
    debug!("Database schema is up to date");
    Ok(())
}

pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let (one,): (i64,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;
    if one != 1 {
        return Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ));
    }
    debug!("Database health check passed");
    Ok(())
}
