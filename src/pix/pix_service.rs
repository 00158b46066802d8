use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::pix_keys::{gen_e2e_id, gen_evp, mask_key, normalize_pix_key};
use super::pix_model::{
    NewPixKey, PixDirection, PixKey, PixKeyDB, PixKeyType, PixSendRequest, PixTransfer,
    PixTransferDB, PIX_STATUS_COMPLETED,
};
use super::pix_repository::PixRepository;
use crate::accounts::AccountRepository;
use crate::constants::MAX_NOTE_LEN;
use crate::db::DbTransactionExecutor;
use crate::ledger::{LedgerEntryDB, LedgerKind, LedgerRepository};
use crate::pix::{PixError, Result};

/// Service for Pix key management and key-addressed transfers
pub struct PixService {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl PixService {
    /// Creates a new PixService instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Registers a key for an account. EVP keys with no value are
    /// generated. Keys are globally unique on (type, value).
    pub async fn create_key(&self, new_key: NewPixKey) -> Result<PixKey> {
        let normalized = match (&new_key.key_type, new_key.value.as_deref()) {
            (PixKeyType::Evp, None) => gen_evp(),
            (key_type, value) => normalize_pix_key(*key_type, value.unwrap_or(""))?,
        };
        debug!(
            "Registering {} Pix key for account {}",
            new_key.key_type.as_str(),
            new_key.account_id
        );

        let key_db = PixKeyDB {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: new_key.account_id.clone(),
            key_type: new_key.key_type.as_str().to_string(),
            value: normalized.clone(),
            is_primary: new_key.set_primary,
            created_at: chrono::Utc::now().naive_utc(),
        };

        self.pool.execute(|conn| {
            if PixRepository::find_key_by_value_in_tx(conn, new_key.key_type, &normalized)?
                .is_some()
            {
                return Err(PixError::KeyAlreadyRegistered);
            }
            if new_key.set_primary {
                PixRepository::clear_primary_in_tx(conn, &new_key.account_id)?;
            }
            PixRepository::insert_key_in_tx(conn, &key_db)?;
            PixKey::try_from(key_db.clone())
        })
    }

    /// Lists an account's keys, primary first
    pub fn list_keys(&self, account_id: &str) -> Result<Vec<PixKey>> {
        let repo = PixRepository::new(self.pool.clone());
        repo.list_keys(account_id)
    }

    /// Makes one key primary, demoting the others atomically
    pub async fn set_primary(&self, account_id: &str, key_id: &str) -> Result<()> {
        let repo = PixRepository::new(self.pool.clone());
        let key = repo.get_owned_key(key_id, account_id)?;

        self.pool.execute(|conn| {
            PixRepository::clear_primary_in_tx(conn, account_id)?;
            PixRepository::set_primary_in_tx(conn, &key.id)?;
            Ok(())
        })
    }

    /// Removes a key the account owns
    pub fn delete_key(&self, account_id: &str, key_id: &str) -> Result<()> {
        let repo = PixRepository::new(self.pool.clone());
        let key = repo.get_owned_key(key_id, account_id)?;
        repo.delete_key(&key.id)
    }

    /// Sends funds to whatever account holds the destination key.
    ///
    /// Debit, credit, the TRANSFER ledger entry and both Pix transfer rows
    /// (OUT for the source, IN for the destination, sharing one end-to-end
    /// id) apply in a single transaction.
    pub async fn send(&self, request: PixSendRequest) -> Result<PixTransfer> {
        request.validate()?;
        let normalized = normalize_pix_key(request.key_type, &request.key)?;

        let repo = PixRepository::new(self.pool.clone());
        let dest_key = repo
            .find_key_by_value(request.key_type, &normalized)?
            .ok_or_else(|| PixError::NotFound("Pix key not found".to_string()))?;

        if dest_key.account_id == request.from_account_id {
            return Err(PixError::SelfTransfer);
        }

        let description = request
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| n.chars().take(MAX_NOTE_LEN).collect::<String>())
            .unwrap_or_else(|| {
                format!(
                    "PIX {} • {}",
                    request.key_type.as_str(),
                    mask_key(request.key_type, &normalized)
                )
            });

        let now = chrono::Utc::now().naive_utc();
        let e2e = gen_e2e_id();
        debug!(
            "Pix send of {} cents from {} ({})",
            request.amount_cents, request.from_account_id, e2e
        );

        let make_row = |direction: PixDirection| PixTransferDB {
            id: uuid::Uuid::new_v4().to_string(),
            end_to_end_id: e2e.clone(),
            from_account_id: request.from_account_id.clone(),
            to_account_id: dest_key.account_id.clone(),
            amount_cents: request.amount_cents,
            description: Some(description.clone()),
            direction: direction.as_str().to_string(),
            status: PIX_STATUS_COMPLETED.to_string(),
            completed_at: Some(now),
            created_at: now,
        };
        let out_row = make_row(PixDirection::Out);
        let in_row = make_row(PixDirection::In);

        let ledger_entry = LedgerEntryDB {
            id: uuid::Uuid::new_v4().to_string(),
            kind: LedgerKind::Transfer.as_str().to_string(),
            amount_cents: request.amount_cents,
            note: Some(description.clone()),
            from_account_id: Some(request.from_account_id.clone()),
            to_account_id: Some(dest_key.account_id.clone()),
            created_at: now,
        };

        self.pool.execute(|conn| {
            // Source must exist; the debit checks the balance
            AccountRepository::get_by_id_in_tx(conn, &request.from_account_id)?;
            AccountRepository::debit_in_tx(conn, &request.from_account_id, request.amount_cents)?;
            AccountRepository::credit_in_tx(conn, &dest_key.account_id, request.amount_cents)?;

            LedgerRepository::insert_in_tx(conn, &ledger_entry)
                .map_err(|e| PixError::DatabaseError(e.to_string()))?;

            PixRepository::insert_transfer_in_tx(conn, &out_row)?;
            PixRepository::insert_transfer_in_tx(conn, &in_row)?;

            Ok(out_row.clone().into())
        })
    }

    /// Lists the account's Pix movements, optionally one direction only
    pub fn list_transfers(
        &self,
        account_id: &str,
        direction: Option<PixDirection>,
    ) -> Result<Vec<PixTransfer>> {
        let repo = PixRepository::new(self.pool.clone());
        repo.list_transfers(account_id, direction)
    }
}
