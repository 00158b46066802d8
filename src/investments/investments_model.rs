use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::investments_constants::{POSITION_STATUS_ACTIVE, POSITION_STATUS_CLOSED};
use crate::investments::{InvestmentError, Result};

/// Enum representing the position lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Active,
    Closed,
}

impl PositionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionStatus::Active => POSITION_STATUS_ACTIVE,
            PositionStatus::Closed => POSITION_STATUS_CLOSED,
        }
    }
}

impl FromStr for PositionStatus {
    type Err = InvestmentError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            POSITION_STATUS_ACTIVE => Ok(PositionStatus::Active),
            POSITION_STATUS_CLOSED => Ok(PositionStatus::Closed),
            other => Err(InvestmentError::InvalidData(format!(
                "Unknown position status: {}",
                other
            ))),
        }
    }
}

/// Domain model for an investment product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentProduct {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: String,
    pub minute_rate_ppm: i64,
    pub min_amount_cents: i64,
    pub liquidity_minutes: i64,
}

/// Catalog seed entry, upserted by code at startup
#[derive(Debug, Clone)]
pub struct ProductSeed {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub minute_rate_ppm: i64,
    pub min_amount_cents: i64,
    pub liquidity_minutes: i64,
}

/// Input model for opening a position
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyRequest {
    pub account_id: String,
    pub product_id: String,
    pub amount_cents: i64,
}

impl BuyRequest {
    /// Validates the request shape; product-specific minimums are checked
    /// against the catalog by the service.
    pub fn validate(&self) -> Result<()> {
        if self.account_id.trim().is_empty() {
            return Err(InvestmentError::InvalidData(
                "Account is required".to_string(),
            ));
        }
        if self.product_id.trim().is_empty() {
            return Err(InvestmentError::InvalidData(
                "Product is required".to_string(),
            ));
        }
        if self.amount_cents <= 0 {
            return Err(InvestmentError::InvalidData(
                "Amount must be a positive number of cents".to_string(),
            ));
        }
        Ok(())
    }
}

/// A position as presented to callers, with the value accrued up to the
/// moment of the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionView {
    pub id: String,
    pub account_id: String,
    pub status: PositionStatus,
    pub principal_cents: i64,
    pub current_cents: i64,
    pub gain_cents: i64,
    pub opened_at: NaiveDateTime,
    pub closed_at: Option<NaiveDateTime>,
    pub redeemed_cents: Option<i64>,
    pub product: InvestmentProduct,
}

/// Whether a redemption settled the whole position or only a slice of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedemptionKind {
    Full,
    Partial,
}

/// Outcome of a redemption as credited to the account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub position_id: String,
    pub kind: RedemptionKind,
    /// Gross value taken out of the position
    pub gross_cents: i64,
    pub fee_cents: i64,
    /// Amount credited to the account balance
    pub net_cents: i64,
    /// Value left accruing after a partial redemption, zero when full
    pub remaining_current_cents: i64,
    pub remaining_principal_cents: i64,
}

/// Database model for investment products
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::investment_products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentProductDB {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: String,
    pub minute_rate_ppm: i64,
    pub min_amount_cents: i64,
    pub liquidity_minutes: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for investment positions
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::investment_positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentPositionDB {
    pub id: String,
    pub account_id: String,
    pub product_id: String,
    pub principal_cents: i64,
    /// Accrual clock start; reset by partial redemptions
    pub opened_at: NaiveDateTime,
    pub status: String,
    pub closed_at: Option<NaiveDateTime>,
    pub redeemed_cents: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations
impl From<InvestmentProductDB> for InvestmentProduct {
    fn from(db: InvestmentProductDB) -> Self {
        Self {
            id: db.id,
            code: db.code,
            name: db.name,
            description: db.description,
            minute_rate_ppm: db.minute_rate_ppm,
            min_amount_cents: db.min_amount_cents,
            liquidity_minutes: db.liquidity_minutes,
        }
    }
}
