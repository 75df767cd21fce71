mod accounts;
mod entries;
mod error;
mod migrations;
mod queries;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use accounts::*;
pub use entries::*;
pub use error::*;
pub use migrations::*;
pub use queries::*;

/// Open a connection pool for the given SQLite URL with foreign keys enforced.
/// The returned pool is owned by the caller and handed to [`Queries`] or
/// [`crate::application::LedgerService`].
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str(database_url)?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await?;

    tracing::debug!(url = database_url, max_connections, "database pool opened");
    Ok(pool)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Decode(format!("invalid timestamp '{}': {}", value, e)))
}
