use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};
use tracing::debug;

use crate::domain::{Account, AccountId, Cents, NewAccount};

use super::{parse_timestamp, StoreError};

const ACCOUNT_COLUMNS: &str = "id, owner, currency, balance, created_at";

/// Insert an account with a zero balance.
pub async fn create_account<'e, E>(executor: E, account: &NewAccount) -> Result<Account, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(owner = %account.owner, currency = %account.currency, "creating account");

    let sql = format!(
        "INSERT INTO accounts (owner, currency, balance, created_at) VALUES (?, ?, 0, ?) RETURNING {ACCOUNT_COLUMNS}"
    );
    let row = sqlx::query(&sql)
        .bind(&account.owner)
        .bind(&account.currency)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(executor)
        .await?;

    row_to_account(&row)
}

pub async fn get_account<'e, E>(executor: E, id: AccountId) -> Result<Account, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ? LIMIT 1");
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| StoreError::not_found("account", id))?;

    row_to_account(&row)
}

/// One page of accounts, ascending by id.
pub async fn list_accounts<'e, E>(executor: E, limit: u32, offset: u32) -> Result<Vec<Account>, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    if limit == 0 {
        return Ok(Vec::new());
    }

    let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id LIMIT ? OFFSET ?");
    let rows = sqlx::query(&sql)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(executor)
        .await?;

    rows.iter().map(row_to_account).collect()
}

/// Every account, ascending by id.
pub async fn list_all_accounts<'e, E>(executor: E) -> Result<Vec<Account>, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id");
    let rows = sqlx::query(&sql).fetch_all(executor).await?;

    rows.iter().map(row_to_account).collect()
}

/// Add `delta` to the stored balance and return the updated account.
pub async fn add_account_balance<'e, E>(
    executor: E,
    id: AccountId,
    delta: Cents,
) -> Result<Account, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(account_id = id, delta, "adjusting balance");

    let sql = format!("UPDATE accounts SET balance = balance + ? WHERE id = ? RETURNING {ACCOUNT_COLUMNS}");
    let row = sqlx::query(&sql)
        .bind(delta)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| StoreError::not_found("account", id))?;

    row_to_account(&row)
}

fn row_to_account(row: &SqliteRow) -> Result<Account, StoreError> {
    let created_at: String = row.try_get("created_at")?;

    Ok(Account {
        id: row.try_get("id")?,
        owner: row.try_get("owner")?,
        currency: row.try_get("currency")?,
        balance: row.try_get("balance")?,
        created_at: parse_timestamp(&created_at)?,
    })
}
