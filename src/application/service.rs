use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::domain::{
    build_balance_report, Account, AccountId, BalanceReport, Cents, CreateEntryParams, Entry,
    EntryId, ListEntriesParams, NewAccount,
};
use crate::storage::{self, Queries};

use super::AppError;

/// Page size used when walking every entry of an account.
const SCAN_PAGE_SIZE: u32 = 500;

/// Application service providing balance-aware operations on the ledger.
/// This is the primary interface for any client (CLI, tests, ...).
#[derive(Debug, Clone)]
pub struct LedgerService {
    queries: Queries,
}

/// Result of posting an entry
#[derive(Debug, Clone)]
pub struct PostingResult {
    pub entry: Entry,
    /// The account as it is after the entry was applied
    pub account: Account,
}

impl LedgerService {
    /// Create a new ledger service over an already opened pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            queries: Queries::new(pool),
        }
    }

    /// Open the database and apply every pending migration.
    pub async fn init(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let service = Self::connect(database_url, max_connections).await?;
        service.migrate_up(None).await?;
        Ok(service)
    }

    /// Open the database without touching the schema.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = storage::connect(database_url, max_connections).await?;
        Ok(Self::new(pool))
    }

    pub fn queries(&self) -> &Queries {
        &self.queries
    }

    // ========================
    // Schema
    // ========================

    pub async fn migrate_up(&self, steps: Option<usize>) -> Result<Vec<i64>, AppError> {
        Ok(storage::migrate_up(self.queries.pool(), steps).await?)
    }

    pub async fn migrate_down(&self, steps: Option<usize>) -> Result<Vec<i64>, AppError> {
        Ok(storage::migrate_down(self.queries.pool(), steps).await?)
    }

    pub async fn applied_migrations(&self) -> Result<Vec<i64>, AppError> {
        Ok(storage::applied_versions(self.queries.pool()).await?)
    }

    // ========================
    // Accounts
    // ========================

    /// Open a new account with a zero balance.
    pub async fn open_account(
        &self,
        owner: impl Into<String>,
        currency: impl Into<String>,
    ) -> Result<Account, AppError> {
        let new_account = NewAccount::new(owner, currency).normalized()?;
        let account = self.queries.create_account(&new_account).await?;
        info!(account_id = account.id, owner = %account.owner, "account opened");
        Ok(account)
    }

    pub async fn get_account(&self, id: AccountId) -> Result<Account, AppError> {
        Ok(self.queries.get_account(id).await?)
    }

    pub async fn list_accounts(&self, limit: u32, offset: u32) -> Result<Vec<Account>, AppError> {
        Ok(self.queries.list_accounts(limit, offset).await?)
    }

    // ========================
    // Entries
    // ========================

    /// Record an entry and apply it to the account balance in one transaction.
    /// Either both writes happen or neither does.
    pub async fn post_entry(&self, account_id: AccountId, amount: Cents) -> Result<PostingResult, AppError> {
        let mut tx = self.queries.pool().begin().await.map_err(storage::StoreError::from)?;

        let entry = storage::create_entry(&mut *tx, CreateEntryParams { account_id, amount }).await?;
        let account = storage::add_account_balance(&mut *tx, account_id, amount).await?;

        tx.commit().await.map_err(storage::StoreError::from)?;

        info!(
            entry_id = entry.id,
            account_id,
            amount,
            balance = account.balance,
            "entry posted"
        );
        Ok(PostingResult { entry, account })
    }

    pub async fn get_entry(&self, id: EntryId) -> Result<Entry, AppError> {
        Ok(self.queries.get_entry(id).await?)
    }

    pub async fn list_entries(&self, params: ListEntriesParams) -> Result<Vec<Entry>, AppError> {
        Ok(self.queries.list_entries(params).await?)
    }

    /// Every entry of an account, fetched page by page. Fails with `NotFound`
    /// if the account does not exist.
    pub async fn all_entries(&self, account_id: AccountId) -> Result<Vec<Entry>, AppError> {
        self.queries.get_account(account_id).await?;

        let mut entries = Vec::new();
        let mut page = ListEntriesParams::new(account_id, SCAN_PAGE_SIZE, 0);
        loop {
            let batch = self.queries.list_entries(page).await?;
            let done = batch.len() < SCAN_PAGE_SIZE as usize;
            entries.extend(batch);
            if done {
                break;
            }
            page = page.next_page();
        }
        Ok(entries)
    }

    // ========================
    // Integrity
    // ========================

    /// Compare every stored balance with the sum of the account's entries.
    pub async fn check_balances(&self) -> Result<BalanceReport, AppError> {
        let accounts = self.queries.list_all_accounts().await?;
        let sums = self.queries.entry_sums().await?;

        let report = build_balance_report(&accounts, &sums);
        for mismatch in &report.mismatches {
            warn!(
                account_id = mismatch.account_id,
                stored = mismatch.stored,
                from_entries = %mismatch.from_entries,
                "balance does not match entries"
            );
        }
        Ok(report)
    }
}
