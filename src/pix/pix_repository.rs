use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::pix::{PixError, Result};
use crate::schema::{pix_keys, pix_transfers};

use super::pix_model::{
    PixDirection, PixKey, PixKeyDB, PixKeyType, PixTransfer, PixTransferDB, PIX_DIRECTION_IN,
    PIX_DIRECTION_OUT,
};

/// Repository for Pix keys and transfers
pub struct PixRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl PixRepository {
    /// Creates a new PixRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| PixError::DatabaseError(e.to_string()))
    }

    /// Global lookup by (type, value); keys are unique across all accounts
    pub fn find_key_by_value(
        &self,
        key_type: PixKeyType,
        value: &str,
    ) -> Result<Option<PixKeyDB>> {
        let mut conn = self.conn()?;
        Self::find_key_by_value_in_tx(&mut conn, key_type, value)
    }

    pub fn find_key_by_value_in_tx(
        conn: &mut SqliteConnection,
        key_type: PixKeyType,
        value: &str,
    ) -> Result<Option<PixKeyDB>> {
        Ok(pix_keys::table
            .filter(pix_keys::key_type.eq(key_type.as_str()))
            .filter(pix_keys::value.eq(value))
            .first::<PixKeyDB>(conn)
            .optional()?)
    }

    /// Loads a key, checking it belongs to the given account
    pub fn get_owned_key(&self, key_id: &str, account_id: &str) -> Result<PixKeyDB> {
        let mut conn = self.conn()?;

        pix_keys::table
            .find(key_id)
            .filter(pix_keys::account_id.eq(account_id))
            .first::<PixKeyDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    PixError::NotFound(format!("Pix key {} not found", key_id))
                }
                _ => PixError::DatabaseError(e.to_string()),
            })
    }

    /// Lists an account's keys, primary first, newest first
    pub fn list_keys(&self, account_id: &str) -> Result<Vec<PixKey>> {
        let mut conn = self.conn()?;

        let rows = pix_keys::table
            .filter(pix_keys::account_id.eq(account_id))
            .order((pix_keys::is_primary.desc(), pix_keys::created_at.desc()))
            .load::<PixKeyDB>(&mut conn)?;

        rows.into_iter().map(PixKey::try_from).collect()
    }

    /// Clears the primary flag on every key of the account
    pub fn clear_primary_in_tx(conn: &mut SqliteConnection, account_id: &str) -> Result<()> {
        diesel::update(pix_keys::table.filter(pix_keys::account_id.eq(account_id)))
            .set(pix_keys::is_primary.eq(false))
            .execute(conn)?;
        Ok(())
    }

    pub fn set_primary_in_tx(conn: &mut SqliteConnection, key_id: &str) -> Result<()> {
        diesel::update(pix_keys::table.find(key_id))
            .set(pix_keys::is_primary.eq(true))
            .execute(conn)?;
        Ok(())
    }

    pub fn insert_key_in_tx(conn: &mut SqliteConnection, key: &PixKeyDB) -> Result<()> {
        diesel::insert_into(pix_keys::table)
            .values(key)
            .execute(conn)?;
        Ok(())
    }

    /// Deletes a key by id; the caller has already checked ownership
    pub fn delete_key(&self, key_id: &str) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::delete(pix_keys::table.find(key_id)).execute(&mut conn)?;
        Ok(())
    }

    pub fn insert_transfer_in_tx(
        conn: &mut SqliteConnection,
        transfer: &PixTransferDB,
    ) -> Result<()> {
        diesel::insert_into(pix_transfers::table)
            .values(transfer)
            .execute(conn)?;
        Ok(())
    }

    /// Lists the account's transfer rows, optionally one direction only
    pub fn list_transfers(
        &self,
        account_id: &str,
        direction: Option<PixDirection>,
    ) -> Result<Vec<PixTransfer>> {
        let mut conn = self.conn()?;

        let mut query = pix_transfers::table.into_boxed();
        query = match direction {
            Some(PixDirection::Out) => query.filter(
                pix_transfers::from_account_id
                    .eq(account_id.to_string())
                    .and(pix_transfers::direction.eq(PIX_DIRECTION_OUT)),
            ),
            Some(PixDirection::In) => query.filter(
                pix_transfers::to_account_id
                    .eq(account_id.to_string())
                    .and(pix_transfers::direction.eq(PIX_DIRECTION_IN)),
            ),
            None => query.filter(
                pix_transfers::from_account_id
                    .eq(account_id.to_string())
                    .and(pix_transfers::direction.eq(PIX_DIRECTION_OUT))
                    .or(pix_transfers::to_account_id
                        .eq(account_id.to_string())
                        .and(pix_transfers::direction.eq(PIX_DIRECTION_IN))),
            ),
        };

        let rows = query
            .order(pix_transfers::created_at.desc())
            .load::<PixTransferDB>(&mut conn)?;

        Ok(rows.into_iter().map(PixTransfer::from).collect())
    }
}
