use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::cards::{CardError, Result};

pub const CARD_TYPE_DEBIT: &str = "DEBIT";
pub const CARD_TYPE_CREDIT: &str = "CREDIT";

pub const CARD_STATUS_ACTIVE: &str = "ACTIVE";
pub const CARD_STATUS_BLOCKED: &str = "BLOCKED";
pub const CARD_STATUS_CANCELED: &str = "CANCELED";

/// Enum representing the card function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Debit,
    Credit,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Debit => CARD_TYPE_DEBIT,
            CardType::Credit => CARD_TYPE_CREDIT,
        }
    }
}

impl FromStr for CardType {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            CARD_TYPE_DEBIT => Ok(CardType::Debit),
            CARD_TYPE_CREDIT => Ok(CardType::Credit),
            other => Err(CardError::InvalidData(format!(
                "Unknown card type: {}",
                other
            ))),
        }
    }
}

/// Enum representing the card lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    Active,
    Blocked,
    Canceled,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Active => CARD_STATUS_ACTIVE,
            CardStatus::Blocked => CARD_STATUS_BLOCKED,
            CardStatus::Canceled => CARD_STATUS_CANCELED,
        }
    }
}

impl FromStr for CardStatus {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            CARD_STATUS_ACTIVE => Ok(CardStatus::Active),
            CARD_STATUS_BLOCKED => Ok(CardStatus::Blocked),
            CARD_STATUS_CANCELED => Ok(CardStatus::Canceled),
            other => Err(CardError::InvalidData(format!(
                "Unknown card status: {}",
                other
            ))),
        }
    }
}

/// Status actions accepted by card update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardAction {
    Block,
    Unblock,
    Cancel,
}

/// Domain model for a card. The PAN token is a cosmetic identifier, not a
/// real PAN.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub account_id: String,
    pub card_type: CardType,
    pub is_virtual: bool,
    pub brand: String,
    pub holder_name: String,
    pub last4: String,
    pub exp_month: i32,
    pub exp_year: i32,
    pub status: CardStatus,
    pub credit_limit_cents: Option<i64>,
    pub available_credit_cents: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for card issuance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub account_id: String,
    pub card_type: CardType,
    #[serde(default)]
    pub is_virtual: bool,
    pub brand: Option<String>,
    pub holder_name: String,
    pub credit_limit_cents: Option<i64>,
}

impl NewCard {
    /// Validates the issuance request
    pub fn validate(&self) -> Result<()> {
        if self.account_id.trim().is_empty() {
            return Err(CardError::InvalidData("Account is required".to_string()));
        }
        if self.holder_name.trim().is_empty() {
            return Err(CardError::InvalidData(
                "Holder name is required".to_string(),
            ));
        }
        if self.card_type == CardType::Credit
            && !matches!(self.credit_limit_cents, Some(limit) if limit > 0)
        {
            return Err(CardError::InvalidData(
                "Credit cards need a positive credit limit in cents".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input model for card update: a status action, a new credit limit, or both
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdate {
    pub action: Option<CardAction>,
    pub credit_limit_cents: Option<i64>,
}

/// Database model for cards
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CardDB {
    pub id: String,
    pub account_id: String,
    pub card_type: String,
    pub is_virtual: bool,
    pub brand: String,
    pub holder_name: String,
    pub last4: String,
    pub pan_token: String,
    pub exp_month: i32,
    pub exp_year: i32,
    pub status: String,
    pub credit_limit_cents: Option<i64>,
    pub available_credit_cents: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations
impl TryFrom<CardDB> for Card {
    type Error = CardError;

    fn try_from(db: CardDB) -> Result<Self> {
        Ok(Self {
            card_type: CardType::from_str(&db.card_type)?,
            status: CardStatus::from_str(&db.status)?,
            id: db.id,
            account_id: db.account_id,
            is_virtual: db.is_virtual,
            brand: db.brand,
            holder_name: db.holder_name,
            last4: db.last4,
            exp_month: db.exp_month,
            exp_year: db.exp_year,
            credit_limit_cents: db.credit_limit_cents,
            available_credit_cents: db.available_credit_cents,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
