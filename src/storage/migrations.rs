use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;

use super::StoreError;

/// A versioned schema change with its rollback.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub up: &'static str,
    pub down: &'static str,
}

/// All migrations known to this build, in version order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_accounts",
        up: include_str!("migrations/001_create_accounts.up.sql"),
        down: include_str!("migrations/001_create_accounts.down.sql"),
    },
    Migration {
        version: 2,
        name: "create_entries",
        up: include_str!("migrations/002_create_entries.up.sql"),
        down: include_str!("migrations/002_create_entries.down.sql"),
    },
];

const CREATE_MIGRATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL
)
"#;

async fn ensure_migrations_table(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query(CREATE_MIGRATIONS_TABLE).execute(pool).await?;
    Ok(())
}

/// Versions currently applied, ascending.
pub async fn applied_versions(pool: &SqlitePool) -> Result<Vec<i64>, StoreError> {
    ensure_migrations_table(pool).await?;

    let rows = sqlx::query("SELECT version FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| row.try_get("version").map_err(StoreError::from))
        .collect()
}

/// Apply pending migrations in version order. `steps = None` applies all of
/// them. Returns the versions that were applied.
pub async fn migrate_up(pool: &SqlitePool, steps: Option<usize>) -> Result<Vec<i64>, StoreError> {
    let applied = applied_versions(pool).await?;
    let pending = MIGRATIONS
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .take(steps.unwrap_or(usize::MAX));

    let mut done = Vec::new();
    for migration in pending {
        let mut tx = pool.begin().await?;

        sqlx::raw_sql(migration.up).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .bind(Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(version = migration.version, name = migration.name, "migration applied");
        done.push(migration.version);
    }

    Ok(done)
}

/// Roll back the most recently applied migrations. `steps = None` rolls back
/// all of them. Returns the versions that were rolled back, newest first.
pub async fn migrate_down(pool: &SqlitePool, steps: Option<usize>) -> Result<Vec<i64>, StoreError> {
    let applied = applied_versions(pool).await?;

    let mut done = Vec::new();
    for version in applied.iter().rev().take(steps.unwrap_or(usize::MAX)) {
        let migration = MIGRATIONS
            .iter()
            .find(|m| m.version == *version)
            .ok_or(StoreError::UnknownMigration(*version))?;

        let mut tx = pool.begin().await?;

        sqlx::raw_sql(migration.down).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM schema_migrations WHERE version = ?")
            .bind(migration.version)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(version = migration.version, name = migration.name, "migration rolled back");
        done.push(migration.version);
    }

    Ok(done)
}
