use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Account, AccountId, CentsSum, Entry};

/// An account together with all of its entries, as written by the JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatement {
    pub exported_at: DateTime<Utc>,
    pub account: Account,
    pub entries: Vec<Entry>,
}

/// Exporter for writing an account's entries in various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export an account's entries to CSV, one row per entry with a running balance.
    pub async fn export_entries_csv<W: Write>(&self, account_id: AccountId, writer: W) -> Result<usize> {
        let entries = self.service.all_entries(account_id).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "account_id", "amount_cents", "running_balance", "created_at"])?;

        let mut running: CentsSum = 0;
        for entry in &entries {
            running = running
                .checked_add(CentsSum::from(entry.amount))
                .with_context(|| format!("Running balance overflows at entry {}", entry.id))?;
            csv_writer.write_record(&[
                entry.id.to_string(),
                entry.account_id.to_string(),
                entry.amount.to_string(),
                running.to_string(),
                entry.created_at.to_rfc3339(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(entries.len())
    }

    /// Export an account and its entries as a single JSON document.
    pub async fn export_statement_json<W: Write>(&self, account_id: AccountId, writer: W) -> Result<usize> {
        let account = self.service.get_account(account_id).await?;
        let entries = self.service.all_entries(account_id).await?;
        let count = entries.len();

        let statement = AccountStatement {
            exported_at: Utc::now(),
            account,
            entries,
        };
        serde_json::to_writer_pretty(writer, &statement)?;
        Ok(count)
    }
}
