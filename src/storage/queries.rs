use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::domain::{
    Account, AccountId, Cents, CentsSum, CreateEntryParams, Entry, EntryId, ListEntriesParams, NewAccount,
};

use super::{accounts, entries, StoreError};

/// Typed queries over an injected connection pool.
///
/// Every method is a single statement; none of them opens a transaction,
/// retries, or adjusts balances on its own. To run several of them
/// atomically, call the free functions in [`crate::storage`] with a transaction
/// as the executor.
#[derive(Debug, Clone)]
pub struct Queries {
    pool: SqlitePool,
}

impl Queries {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ========================
    // Entry queries
    // ========================

    pub async fn create_entry(&self, params: CreateEntryParams) -> Result<Entry, StoreError> {
        entries::create_entry(&self.pool, params).await
    }

    pub async fn get_entry(&self, id: EntryId) -> Result<Entry, StoreError> {
        entries::get_entry(&self.pool, id).await
    }

    pub async fn list_entries(&self, params: ListEntriesParams) -> Result<Vec<Entry>, StoreError> {
        entries::list_entries(&self.pool, params).await
    }

    pub async fn sum_entries(&self, account_id: AccountId) -> Result<CentsSum, StoreError> {
        entries::sum_entries(&self.pool, account_id).await
    }

    pub async fn entry_sums(&self) -> Result<HashMap<AccountId, CentsSum>, StoreError> {
        entries::entry_sums(&self.pool).await
    }

    // ========================
    // Account queries
    // ========================

    pub async fn create_account(&self, account: &NewAccount) -> Result<Account, StoreError> {
        accounts::create_account(&self.pool, account).await
    }

    pub async fn get_account(&self, id: AccountId) -> Result<Account, StoreError> {
        accounts::get_account(&self.pool, id).await
    }

    pub async fn list_accounts(&self, limit: u32, offset: u32) -> Result<Vec<Account>, StoreError> {
        accounts::list_accounts(&self.pool, limit, offset).await
    }

    pub async fn list_all_accounts(&self) -> Result<Vec<Account>, StoreError> {
        accounts::list_all_accounts(&self.pool).await
    }

    pub async fn add_account_balance(&self, id: AccountId, delta: Cents) -> Result<Account, StoreError> {
        accounts::add_account_balance(&self.pool, id, delta).await
    }
}
