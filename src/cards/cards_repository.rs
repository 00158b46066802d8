use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::cards::{CardError, Result};
use crate::db::get_connection;
use crate::schema::cards;

use super::cards_model::{Card, CardDB, CardStatus};

/// Repository for managing card data in the database
pub struct CardRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl CardRepository {
    /// Creates a new CardRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| CardError::DatabaseError(e.to_string()))
    }

    /// Inserts a new card
    pub fn create(&self, card_db: &CardDB) -> Result<Card> {
        let mut conn = self.conn()?;

        diesel::insert_into(cards::table)
            .values(card_db)
            .execute(&mut conn)?;

        Card::try_from(card_db.clone())
    }

    /// Retrieves a card by its ID
    pub fn get_by_id(&self, card_id: &str) -> Result<Card> {
        self.get_db_by_id(card_id).and_then(Card::try_from)
    }

    pub(crate) fn get_db_by_id(&self, card_id: &str) -> Result<CardDB> {
        let mut conn = self.conn()?;

        cards::table
            .find(card_id)
            .first::<CardDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    CardError::NotFound(format!("Card with id {} not found", card_id))
                }
                _ => CardError::DatabaseError(e.to_string()),
            })
    }

    /// Lists an account's cards, newest first
    pub fn list(&self, account_id: &str) -> Result<Vec<Card>> {
        let mut conn = self.conn()?;

        let rows = cards::table
            .filter(cards::account_id.eq(account_id))
            .order(cards::created_at.desc())
            .load::<CardDB>(&mut conn)?;

        rows.into_iter().map(Card::try_from).collect()
    }

    /// Updates the lifecycle status
    pub fn set_status(&self, card_id: &str, status: CardStatus) -> Result<()> {
        let mut conn = self.conn()?;

        diesel::update(cards::table.find(card_id))
            .set((
                cards::status.eq(status.as_str()),
                cards::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;
        Ok(())
    }

    /// Updates the credit limit and recomputed available credit
    pub fn set_credit_limit(
        &self,
        card_id: &str,
        credit_limit_cents: i64,
        available_credit_cents: i64,
    ) -> Result<()> {
        let mut conn = self.conn()?;

        diesel::update(cards::table.find(card_id))
            .set((
                cards::credit_limit_cents.eq(Some(credit_limit_cents)),
                cards::available_credit_cents.eq(Some(available_credit_cents)),
                cards::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;
        Ok(())
    }
}
