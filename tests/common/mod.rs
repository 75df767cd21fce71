// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use bankledger::application::LedgerService;
use bankledger::domain::{Account, Cents, CreateEntryParams, Entry};
use tempfile::TempDir;

/// Helper to create a migrated test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::init(&database_url(&temp_dir), 2).await?;
    Ok((service, temp_dir))
}

/// Helper to create a test service whose schema has not been migrated yet
pub async fn empty_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::connect(&database_url(&temp_dir), 2).await?;
    Ok((service, temp_dir))
}

pub fn database_url(temp_dir: &TempDir) -> String {
    let db_path = temp_dir.path().join("test.db");
    format!("sqlite:{}?mode=rwc", db_path.display())
}

pub async fn open_account(service: &LedgerService, owner: &str) -> Result<Account> {
    Ok(service.open_account(owner, "EUR").await?)
}

/// Insert raw entries (balance untouched) and return them in order
pub async fn create_entries(
    service: &LedgerService,
    account: &Account,
    amounts: &[Cents],
) -> Result<Vec<Entry>> {
    let mut entries = Vec::with_capacity(amounts.len());
    for &amount in amounts {
        let entry = service
            .queries()
            .create_entry(CreateEntryParams {
                account_id: account.id,
                amount,
            })
            .await?;
        entries.push(entry);
    }
    Ok(entries)
}
