use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::accounts::{AccountError, Result};
use crate::db::get_connection;
use crate::schema::accounts;

use super::accounts_model::{Account, AccountDB};

/// Repository for managing account data in the database
pub struct AccountRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl AccountRepository {
    /// Creates a new AccountRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Retrieves an account by its ID
    pub fn get_by_id(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
        Self::get_by_id_in_tx(&mut conn, account_id).map(Account::from)
    }

    /// Retrieves the account owned by a given user
    pub fn get_by_owner(&self, user_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let account = accounts::table
            .filter(accounts::owner_id.eq(user_id))
            .first::<AccountDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AccountError::NotFound(format!("No account for user {}", user_id))
                }
                _ => AccountError::DatabaseError(e.to_string()),
            })?;

        Ok(account.into())
    }

    /// Retrieves an account by its display number
    pub fn find_by_number(&self, number: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let account = accounts::table
            .filter(accounts::number.eq(number))
            .first::<AccountDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AccountError::NotFound(format!("Account {} not found", number))
                }
                _ => AccountError::DatabaseError(e.to_string()),
            })?;

        Ok(account.into())
    }

    /// Inserts a new account row as part of an enclosing transaction
    pub fn create_in_tx(conn: &mut SqliteConnection, account_db: &AccountDB) -> Result<Account> {
        diesel::insert_into(accounts::table)
            .values(account_db)
            .execute(conn)?;

        Ok(account_db.clone().into())
    }

    /// Loads an account row inside an enclosing transaction
    pub fn get_by_id_in_tx(conn: &mut SqliteConnection, account_id: &str) -> Result<AccountDB> {
        accounts::table
            .find(account_id)
            .first::<AccountDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AccountError::NotFound(format!("Account with id {} not found", account_id))
                }
                _ => AccountError::DatabaseError(e.to_string()),
            })
    }

    /// Number lookup inside an enclosing transaction
    pub fn find_by_number_in_tx(conn: &mut SqliteConnection, number: &str) -> Result<AccountDB> {
        accounts::table
            .filter(accounts::number.eq(number))
            .first::<AccountDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AccountError::NotFound(format!("Account {} not found", number))
                }
                _ => AccountError::DatabaseError(e.to_string()),
            })
    }

    /// Credits an account inside an enclosing transaction
    pub fn credit_in_tx(
        conn: &mut SqliteConnection,
        account_id: &str,
        amount_cents: i64,
    ) -> Result<()> {
        // Ensure the row exists so a typo'd id surfaces as NotFound
        Self::get_by_id_in_tx(conn, account_id)?;

        diesel::update(accounts::table.find(account_id))
            .set((
                accounts::balance_cents.eq(accounts::balance_cents + amount_cents),
                accounts::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        Ok(())
    }

    /// Debits an account inside an enclosing transaction.
    ///
    /// The balance check runs against the same transactional snapshot as the
    /// update, so a concurrent debit cannot drive the balance negative.
    pub fn debit_in_tx(
        conn: &mut SqliteConnection,
        account_id: &str,
        amount_cents: i64,
    ) -> Result<()> {
        let account = Self::get_by_id_in_tx(conn, account_id)?;
        if account.balance_cents < amount_cents {
            return Err(AccountError::InsufficientFunds {
                balance_cents: account.balance_cents,
                requested_cents: amount_cents,
            });
        }

        diesel::update(accounts::table.find(account_id))
            .set((
                accounts::balance_cents.eq(accounts::balance_cents - amount_cents),
                accounts::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        Ok(())
    }
}
