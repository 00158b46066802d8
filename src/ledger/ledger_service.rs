use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::ledger_model::{EntryFilter, EntryPage, LedgerEntry, LedgerEntryDB, LedgerKind};
use super::ledger_repository::LedgerRepository;
use crate::accounts::AccountRepository;
use crate::constants::MAX_NOTE_LEN;
use crate::db::DbTransactionExecutor;
use crate::ledger::{LedgerError, Result};

/// Service applying balance movements. Every mutation pairs the balance
/// update with a ledger entry inside one transaction.
pub struct LedgerService {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl LedgerService {
    /// Creates a new LedgerService instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Credits an account and records a DEPOSIT entry.
    pub async fn deposit(
        &self,
        account_id: &str,
        amount_cents: i64,
        note: Option<String>,
    ) -> Result<LedgerEntry> {
        validate_amount(amount_cents)?;
        let entry = new_entry(LedgerKind::Deposit, amount_cents, note, None, Some(account_id));
        debug!("Deposit of {} cents into {}", amount_cents, account_id);

        self.pool.execute(|conn| {
            AccountRepository::credit_in_tx(conn, account_id, amount_cents)?;
            LedgerRepository::insert_in_tx(conn, &entry)?;
            Ok(entry.clone().into())
        })
    }

    /// Debits an account and records a WITHDRAW entry. Fails with no
    /// mutation when the balance is insufficient.
    pub async fn withdraw(
        &self,
        account_id: &str,
        amount_cents: i64,
        note: Option<String>,
    ) -> Result<LedgerEntry> {
        validate_amount(amount_cents)?;
        let entry = new_entry(LedgerKind::Withdraw, amount_cents, note, Some(account_id), None);
        debug!("Withdraw of {} cents from {}", amount_cents, account_id);

        self.pool.execute(|conn| {
            AccountRepository::debit_in_tx(conn, account_id, amount_cents)?;
            LedgerRepository::insert_in_tx(conn, &entry)?;
            Ok(entry.clone().into())
        })
    }

    /// Moves funds to the account identified by its display number. Debit,
    /// credit and the TRANSFER entry apply atomically.
    pub async fn transfer(
        &self,
        from_account_id: &str,
        to_number: &str,
        amount_cents: i64,
        note: Option<String>,
    ) -> Result<LedgerEntry> {
        validate_amount(amount_cents)?;
        debug!(
            "Transfer of {} cents from {} to account number {}",
            amount_cents, from_account_id, to_number
        );

        self.pool.execute(|conn| {
            let destination = AccountRepository::find_by_number_in_tx(conn, to_number)?;
            if destination.id == from_account_id {
                return Err(LedgerError::SelfTransfer);
            }

            AccountRepository::debit_in_tx(conn, from_account_id, amount_cents)?;
            AccountRepository::credit_in_tx(conn, &destination.id, amount_cents)?;

            let entry = new_entry(
                LedgerKind::Transfer,
                amount_cents,
                note.clone(),
                Some(from_account_id),
                Some(&destination.id),
            );
            LedgerRepository::insert_in_tx(conn, &entry)?;
            Ok(entry.into())
        })
    }

    /// Statement listing with direction/kind, window, search and cursor.
    pub fn list_entries(&self, account_id: &str, filter: &EntryFilter) -> Result<EntryPage> {
        let repo = LedgerRepository::new(self.pool.clone());
        repo.list(account_id, filter)
    }
}

fn validate_amount(amount_cents: i64) -> Result<()> {
    if amount_cents <= 0 {
        return Err(LedgerError::InvalidData(
            "Amount must be a positive number of cents".to_string(),
        ));
    }
    Ok(())
}

fn new_entry(
    kind: LedgerKind,
    amount_cents: i64,
    note: Option<String>,
    from_account_id: Option<&str>,
    to_account_id: Option<&str>,
) -> LedgerEntryDB {
    let note = note
        .map(|n| n.trim().chars().take(MAX_NOTE_LEN).collect::<String>())
        .filter(|n| !n.is_empty());

    LedgerEntryDB {
        id: uuid::Uuid::new_v4().to_string(),
        kind: kind.as_str().to_string(),
        amount_cents,
        note,
        from_account_id: from_account_id.map(str::to_string),
        to_account_id: to_account_id.map(str::to_string),
        created_at: chrono::Utc::now().naive_utc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(validate_amount(0).is_err());
        assert!(validate_amount(-100).is_err());
        assert!(validate_amount(1).is_ok());
    }

    #[test]
    fn notes_are_trimmed_and_capped() {
        let long = "x".repeat(500);
        let entry = new_entry(LedgerKind::Deposit, 100, Some(long), None, Some("acc"));
        assert_eq!(entry.note.as_ref().map(String::len), Some(MAX_NOTE_LEN));

        let blank = new_entry(LedgerKind::Deposit, 100, Some("   ".to_string()), None, None);
        assert_eq!(blank.note, None);
    }
}
