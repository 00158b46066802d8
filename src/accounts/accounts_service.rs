use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::accounts_model::Account;
use super::accounts_repository::AccountRepository;
use crate::accounts::Result;

/// Service for reading accounts. Balance mutations happen inside the
/// ledger, Pix and investment services, which all go through the
/// repository's in-transaction primitives.
pub struct AccountService {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl AccountService {
    /// Creates a new AccountService instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Retrieves an account by its ID
    pub fn get_account(&self, account_id: &str) -> Result<Account> {
        let repo = AccountRepository::new(self.pool.clone());
        repo.get_by_id(account_id)
    }

    /// Retrieves the account owned by a user
    pub fn get_account_by_owner(&self, user_id: &str) -> Result<Account> {
        let repo = AccountRepository::new(self.pool.clone());
        repo.get_by_owner(user_id)
    }

    /// Retrieves an account by its display number
    pub fn find_by_number(&self, number: &str) -> Result<Account> {
        let repo = AccountRepository::new(self.pool.clone());
        repo.find_by_number(number)
    }

    /// Current balance in cents
    pub fn get_balance(&self, account_id: &str) -> Result<i64> {
        Ok(self.get_account(account_id)?.balance_cents)
    }
}
