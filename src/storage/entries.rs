use std::collections::HashMap;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};
use tracing::debug;

use crate::domain::{
    compute_all_balances, sum_amounts, AccountId, Cents, CentsSum, CreateEntryParams, Entry, EntryId,
    ListEntriesParams,
};

use super::{parse_timestamp, StoreError};

const ENTRY_COLUMNS: &str = "id, account_id, amount, created_at";

/// Insert one entry. The account balance is left untouched.
pub async fn create_entry<'e, E>(executor: E, params: CreateEntryParams) -> Result<Entry, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(account_id = params.account_id, amount = params.amount, "creating entry");

    let sql = format!(
        "INSERT INTO entries (account_id, amount, created_at) VALUES (?, ?, ?) RETURNING {ENTRY_COLUMNS}"
    );
    let row = sqlx::query(&sql)
        .bind(params.account_id)
        .bind(params.amount)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(executor)
        .await?;

    row_to_entry(&row)
}

/// Fetch a single entry by id.
pub async fn get_entry<'e, E>(executor: E, id: EntryId) -> Result<Entry, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ? LIMIT 1");
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| StoreError::not_found("entry", id))?;

    row_to_entry(&row)
}

/// One page of an account's entries, ascending by id. An offset past the end,
/// a zero limit, or an unknown account all give an empty page.
pub async fn list_entries<'e, E>(executor: E, params: ListEntriesParams) -> Result<Vec<Entry>, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    if params.limit == 0 {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM entries WHERE account_id = ? ORDER BY id LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query(&sql)
        .bind(params.account_id)
        .bind(i64::from(params.limit))
        .bind(i64::from(params.offset))
        .fetch_all(executor)
        .await?;

    rows.iter().map(row_to_entry).collect()
}

/// Sum of all entry amounts for an account, zero when it has none.
///
/// Summed in Rust rather than with SQL `SUM()`, which fails once the running
/// total leaves the i64 range.
pub async fn sum_entries<'e, E>(executor: E, account_id: AccountId) -> Result<CentsSum, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("SELECT amount FROM entries WHERE account_id = ?")
        .bind(account_id)
        .fetch_all(executor)
        .await?;

    let amounts = rows
        .iter()
        .map(|row| row.try_get::<Cents, _>("amount"))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sum_amounts(amounts))
}

/// Entry sums for every account that has at least one entry.
pub async fn entry_sums<'e, E>(executor: E) -> Result<HashMap<AccountId, CentsSum>, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("SELECT account_id, amount FROM entries")
        .fetch_all(executor)
        .await?;

    let amounts = rows
        .iter()
        .map(|row| -> Result<(AccountId, Cents), sqlx::Error> {
            Ok((row.try_get("account_id")?, row.try_get("amount")?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(compute_all_balances(amounts))
}

fn row_to_entry(row: &SqliteRow) -> Result<Entry, StoreError> {
    let created_at: String = row.try_get("created_at")?;

    Ok(Entry {
        id: row.try_get("id")?,
        account_id: row.try_get("account_id")?,
        amount: row.try_get("amount")?,
        created_at: parse_timestamp(&created_at)?,
    })
}
