use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::accounts::AccountError;

/// Custom error type for investment operations
#[derive(Debug, Error)]
pub enum InvestmentError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Minimum application is {min_amount_cents} cents")]
    BelowMinimum { min_amount_cents: i64 },
    #[error("Insufficient funds: balance is {balance_cents} cents, requested {requested_cents}")]
    InsufficientFunds {
        balance_cents: i64,
        requested_cents: i64,
    },
    #[error("Position is not active")]
    NotActive,
    #[error("Only closed positions can be removed")]
    NotClosed,
    /// Carries the product's liquidity window in minutes
    #[error("Liquidity in {0} min. Wait to redeem.")]
    LiquidityWindow(i64),
}

impl From<DieselError> for InvestmentError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => InvestmentError::NotFound("Record not found".to_string()),
            _ => InvestmentError::DatabaseError(err.to_string()),
        }
    }
}

impl From<r2d2::Error> for InvestmentError {
    fn from(err: r2d2::Error) -> Self {
        InvestmentError::DatabaseError(err.to_string())
    }
}

impl From<AccountError> for InvestmentError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(msg) => InvestmentError::NotFound(msg),
            AccountError::InvalidData(msg) => InvestmentError::InvalidData(msg),
            AccountError::InsufficientFunds {
                balance_cents,
                requested_cents,
            } => InvestmentError::InsufficientFunds {
                balance_cents,
                requested_cents,
            },
            other => InvestmentError::DatabaseError(other.to_string()),
        }
    }
}

/// Result type for investment operations
pub type Result<T> = std::result::Result<T, InvestmentError>;
