use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::accounts::AccountError;

/// Custom error type for card operations
#[derive(Debug, Error)]
pub enum CardError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for CardError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => CardError::NotFound("Record not found".to_string()),
            _ => CardError::DatabaseError(err.to_string()),
        }
    }
}

impl From<r2d2::Error> for CardError {
    fn from(err: r2d2::Error) -> Self {
        CardError::DatabaseError(err.to_string())
    }
}

impl From<AccountError> for CardError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(msg) => CardError::NotFound(msg),
            AccountError::InvalidData(msg) => CardError::InvalidData(msg),
            other => CardError::DatabaseError(other.to_string()),
        }
    }
}

/// Result type for card operations
pub type Result<T> = std::result::Result<T, CardError>;
