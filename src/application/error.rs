use thiserror::Error;

use crate::domain::AccountInputError;
use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Store(e) if e.is_not_found())
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, AppError::Store(e) if e.is_constraint_violation())
    }
}

impl From<AccountInputError> for AppError {
    fn from(err: AccountInputError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
