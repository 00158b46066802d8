use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::accounts::AccountError;

/// Custom error type for Pix operations
#[derive(Debug, Error)]
pub enum PixError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Pix key already registered")]
    KeyAlreadyRegistered,
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Cannot send Pix to the same account")]
    SelfTransfer,
}

impl From<DieselError> for PixError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => PixError::NotFound("Record not found".to_string()),
            _ => PixError::DatabaseError(err.to_string()),
        }
    }
}

impl From<r2d2::Error> for PixError {
    fn from(err: r2d2::Error) -> Self {
        PixError::DatabaseError(err.to_string())
    }
}

impl From<AccountError> for PixError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(msg) => PixError::NotFound(msg),
            AccountError::InsufficientFunds { .. } => PixError::InsufficientFunds,
            AccountError::InvalidData(msg) => PixError::InvalidData(msg),
            other => PixError::DatabaseError(other.to_string()),
        }
    }
}

/// Result type for Pix operations
pub type Result<T> = std::result::Result<T, PixError>;
