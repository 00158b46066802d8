use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::investments::{InvestmentError, Result};
use crate::schema::{investment_positions, investment_products};

use super::investments_constants::POSITION_STATUS_CLOSED;
use super::investments_model::{InvestmentPositionDB, InvestmentProductDB, ProductSeed};

/// Repository for the product catalog and positions
pub struct InvestmentRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl InvestmentRepository {
    /// Creates a new InvestmentRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| InvestmentError::DatabaseError(e.to_string()))
    }

    /// Upserts a catalog entry by code, keeping the existing row id so
    /// open positions stay attached across re-seeds.
    pub fn upsert_product(&self, seed: &ProductSeed) -> Result<()> {
        let mut conn = self.conn()?;
        let now = chrono::Utc::now().naive_utc();

        let row = InvestmentProductDB {
            id: uuid::Uuid::new_v4().to_string(),
            code: seed.code.to_string(),
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            minute_rate_ppm: seed.minute_rate_ppm,
            min_amount_cents: seed.min_amount_cents,
            liquidity_minutes: seed.liquidity_minutes,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(investment_products::table)
            .values(&row)
            .on_conflict(investment_products::code)
            .do_update()
            .set((
                investment_products::name.eq(&row.name),
                investment_products::description.eq(&row.description),
                investment_products::minute_rate_ppm.eq(row.minute_rate_ppm),
                investment_products::min_amount_cents.eq(row.min_amount_cents),
                investment_products::liquidity_minutes.eq(row.liquidity_minutes),
                investment_products::updated_at.eq(now),
            ))
            .execute(&mut conn)?;
        Ok(())
    }

    /// Lists the catalog, cheapest rate first
    pub fn list_products(&self) -> Result<Vec<InvestmentProductDB>> {
        let mut conn = self.conn()?;

        Ok(investment_products::table
            .order(investment_products::minute_rate_ppm.asc())
            .load::<InvestmentProductDB>(&mut conn)?)
    }

    pub fn get_product(&self, product_id: &str) -> Result<InvestmentProductDB> {
        let mut conn = self.conn()?;
        Self::get_product_in_tx(&mut conn, product_id)
    }

    pub fn get_product_in_tx(
        conn: &mut SqliteConnection,
        product_id: &str,
    ) -> Result<InvestmentProductDB> {
        investment_products::table
            .find(product_id)
            .first::<InvestmentProductDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    InvestmentError::NotFound(format!("Product {} not found", product_id))
                }
                _ => InvestmentError::DatabaseError(e.to_string()),
            })
    }

    /// Loads a position, checking it belongs to the given account
    pub fn get_owned_position(
        &self,
        position_id: &str,
        account_id: &str,
    ) -> Result<InvestmentPositionDB> {
        let mut conn = self.conn()?;
        Self::get_owned_position_in_tx(&mut conn, position_id, account_id)
    }

    pub fn get_owned_position_in_tx(
        conn: &mut SqliteConnection,
        position_id: &str,
        account_id: &str,
    ) -> Result<InvestmentPositionDB> {
        investment_positions::table
            .find(position_id)
            .filter(investment_positions::account_id.eq(account_id))
            .first::<InvestmentPositionDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    InvestmentError::NotFound(format!("Position {} not found", position_id))
                }
                _ => InvestmentError::DatabaseError(e.to_string()),
            })
    }

    pub fn insert_position_in_tx(
        conn: &mut SqliteConnection,
        position: &InvestmentPositionDB,
    ) -> Result<()> {
        diesel::insert_into(investment_positions::table)
            .values(position)
            .execute(conn)?;
        Ok(())
    }

    /// Settles a position after a full redemption
    pub fn close_position_in_tx(
        conn: &mut SqliteConnection,
        position_id: &str,
        redeemed_cents: i64,
        now: chrono::NaiveDateTime,
    ) -> Result<()> {
        diesel::update(investment_positions::table.find(position_id))
            .set((
                investment_positions::status.eq(POSITION_STATUS_CLOSED),
                investment_positions::closed_at.eq(Some(now)),
                investment_positions::redeemed_cents.eq(Some(redeemed_cents)),
                investment_positions::updated_at.eq(now),
            ))
            .execute(conn)?;
        Ok(())
    }

    /// After a partial redemption the remaining value becomes the new
    /// principal and the accrual clock restarts at `now`.
    pub fn reset_position_in_tx(
        conn: &mut SqliteConnection,
        position_id: &str,
        principal_cents: i64,
        now: chrono::NaiveDateTime,
    ) -> Result<()> {
        diesel::update(investment_positions::table.find(position_id))
            .set((
                investment_positions::principal_cents.eq(principal_cents),
                investment_positions::opened_at.eq(now),
                investment_positions::updated_at.eq(now),
            ))
            .execute(conn)?;
        Ok(())
    }

    /// Lists the account's positions with their products, newest first
    pub fn list_positions(
        &self,
        account_id: &str,
    ) -> Result<Vec<(InvestmentPositionDB, InvestmentProductDB)>> {
        let mut conn = self.conn()?;

        Ok(investment_positions::table
            .inner_join(investment_products::table)
            .filter(investment_positions::account_id.eq(account_id))
            .order(investment_positions::opened_at.desc())
            .load::<(InvestmentPositionDB, InvestmentProductDB)>(&mut conn)?)
    }

    /// Deletes one closed position; the caller has already checked ownership
    /// and status.
    pub fn delete_position(&self, position_id: &str) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::delete(investment_positions::table.find(position_id)).execute(&mut conn)?;
        Ok(())
    }

    /// Removes every closed position of the account, returning how many
    /// rows went away.
    pub fn delete_closed(&self, account_id: &str) -> Result<usize> {
        let mut conn = self.conn()?;

        Ok(diesel::delete(
            investment_positions::table
                .filter(investment_positions::account_id.eq(account_id))
                .filter(investment_positions::status.eq(POSITION_STATUS_CLOSED)),
        )
        .execute(&mut conn)?)
    }
}
