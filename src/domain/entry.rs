use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Cents};

pub type EntryId = i64;

/// A single balance movement on one account.
/// Entries are append-only: once recorded they are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Assigned by the database, strictly increasing
    pub id: EntryId,
    pub account_id: AccountId,
    /// Positive = credit, negative = debit. Zero is allowed.
    pub amount: Cents,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateEntryParams {
    pub account_id: AccountId,
    pub amount: Cents,
}

/// Parameters for paging through the entries of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListEntriesParams {
    pub account_id: AccountId,
    pub limit: u32,
    pub offset: u32,
}

impl ListEntriesParams {
    pub fn new(account_id: AccountId, limit: u32, offset: u32) -> Self {
        Self {
            account_id,
            limit,
            offset,
        }
    }

    /// The page following this one.
    pub fn next_page(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            ..*self
        }
    }
}
