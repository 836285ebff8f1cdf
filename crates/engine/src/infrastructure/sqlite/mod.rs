//! SQLite connection pool and schema bootstrap.

mod property_repo;

pub use property_repo::SqlitePropertyRepo;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::infrastructure::config::DatabaseConfig;
use crate::infrastructure::ports::RepoError;

/// How long a writer waits for the database lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a bounded connection pool.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, RepoError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| RepoError::database("connect", e))?
        .create_if_missing(true)
        .busy_timeout(BUSY_TIMEOUT);

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(config.pool_size.max(1))
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.max_lifetime);

    if config.is_in_memory() {
        // Closing the only connection would discard the database
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None);
    }

    pool_options
        .connect_with(options)
        .await
        .map_err(|e| RepoError::database("connect", e))
}

/// Create the listings table if it does not exist yet.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS properties (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            price REAL NOT NULL,
            bedrooms INTEGER,
            bathrooms REAL,
            square_feet REAL,
            address TEXT NOT NULL,
            city TEXT NOT NULL,
            state TEXT NOT NULL,
            zip_code TEXT NOT NULL,
            property_type TEXT,
            listing_type TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| RepoError::database("ensure_schema", e))?;

    Ok(())
}
