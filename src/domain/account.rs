use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

pub type AccountId = i64;

/// A bank account. The balance is derived state: it must always equal the sum
/// of the entries recorded against the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner: String,
    /// ISO 4217 code, e.g. "EUR"
    pub currency: String,
    pub balance: Cents,
    pub created_at: DateTime<Utc>,
}

/// Input for opening an account. The id, balance and creation time are
/// assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub owner: String,
    pub currency: String,
}

impl NewAccount {
    pub fn new(owner: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            currency: currency.into(),
        }
    }

    /// Trim the owner, upper-case the currency and reject obviously bad input.
    pub fn normalized(self) -> Result<Self, AccountInputError> {
        let owner = self.owner.trim().to_string();
        if owner.is_empty() {
            return Err(AccountInputError::EmptyOwner);
        }

        let currency = self.currency.trim().to_ascii_uppercase();
        if !is_currency_code(&currency) {
            return Err(AccountInputError::InvalidCurrency(self.currency));
        }

        Ok(Self { owner, currency })
    }
}

/// Three ASCII letters.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountInputError {
    #[error("account owner must not be empty")]
    EmptyOwner,

    #[error("invalid currency code '{0}' (expected three letters, e.g. EUR)")]
    InvalidCurrency(String),
}
