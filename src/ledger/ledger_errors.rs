use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::accounts::AccountError;

/// Custom error type for ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Cannot transfer to the same account")]
    SelfTransfer,
}

impl From<DieselError> for LedgerError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => LedgerError::NotFound("Record not found".to_string()),
            _ => LedgerError::DatabaseError(err.to_string()),
        }
    }
}

impl From<r2d2::Error> for LedgerError {
    fn from(err: r2d2::Error) -> Self {
        LedgerError::DatabaseError(err.to_string())
    }
}

impl From<AccountError> for LedgerError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(msg) => LedgerError::NotFound(msg),
            AccountError::InsufficientFunds { .. } => LedgerError::InsufficientFunds,
            AccountError::InvalidData(msg) => LedgerError::InvalidData(msg),
            other => LedgerError::DatabaseError(other.to_string()),
        }
    }
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
