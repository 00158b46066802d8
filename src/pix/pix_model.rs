use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::pix::{PixError, Result};

pub const PIX_KEY_TYPE_CPF: &str = "CPF";
pub const PIX_KEY_TYPE_EMAIL: &str = "EMAIL";
pub const PIX_KEY_TYPE_PHONE: &str = "PHONE";
pub const PIX_KEY_TYPE_EVP: &str = "EVP";

pub const PIX_DIRECTION_IN: &str = "IN";
pub const PIX_DIRECTION_OUT: &str = "OUT";

pub const PIX_STATUS_COMPLETED: &str = "COMPLETED";

/// Enum representing the supported Pix key types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PixKeyType {
    Cpf,
    Email,
    Phone,
    Evp,
}

impl PixKeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixKeyType::Cpf => PIX_KEY_TYPE_CPF,
            PixKeyType::Email => PIX_KEY_TYPE_EMAIL,
            PixKeyType::Phone => PIX_KEY_TYPE_PHONE,
            PixKeyType::Evp => PIX_KEY_TYPE_EVP,
        }
    }
}

impl FromStr for PixKeyType {
    type Err = PixError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            PIX_KEY_TYPE_CPF => Ok(PixKeyType::Cpf),
            PIX_KEY_TYPE_EMAIL => Ok(PixKeyType::Email),
            PIX_KEY_TYPE_PHONE => Ok(PixKeyType::Phone),
            PIX_KEY_TYPE_EVP => Ok(PixKeyType::Evp),
            other => Err(PixError::InvalidKey(format!(
                "Unsupported key type: {}",
                other
            ))),
        }
    }
}

/// Direction of a Pix transfer row relative to its account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PixDirection {
    In,
    Out,
}

impl PixDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixDirection::In => PIX_DIRECTION_IN,
            PixDirection::Out => PIX_DIRECTION_OUT,
        }
    }
}

/// Domain model for a registered Pix key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixKey {
    pub id: String,
    pub account_id: String,
    pub key_type: PixKeyType,
    pub value: String,
    pub is_primary: bool,
    pub created_at: NaiveDateTime,
}

/// Input model for key registration. A missing value on an EVP key means
/// "generate one".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPixKey {
    pub account_id: String,
    pub key_type: PixKeyType,
    pub value: Option<String>,
    #[serde(default)]
    pub set_primary: bool,
}

/// Input model for a Pix send
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixSendRequest {
    pub from_account_id: String,
    pub key_type: PixKeyType,
    pub key: String,
    pub amount_cents: i64,
    pub note: Option<String>,
}

impl PixSendRequest {
    /// Validates the request shape before any business logic runs
    pub fn validate(&self) -> Result<()> {
        if self.from_account_id.trim().is_empty() {
            return Err(PixError::InvalidData(
                "Source account is required".to_string(),
            ));
        }
        if self.key.trim().is_empty() {
            return Err(PixError::InvalidData("Pix key is required".to_string()));
        }
        if self.amount_cents <= 0 {
            return Err(PixError::InvalidData(
                "Amount must be a positive number of cents".to_string(),
            ));
        }
        Ok(())
    }
}

/// Domain model for one direction of a Pix movement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixTransfer {
    pub id: String,
    pub end_to_end_id: String,
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub direction: PixDirection,
    pub status: String,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Database model for Pix keys
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::pix_keys)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PixKeyDB {
    pub id: String,
    pub account_id: String,
    pub key_type: String,
    pub value: String,
    pub is_primary: bool,
    pub created_at: NaiveDateTime,
}

/// Database model for Pix transfers
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::pix_transfers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PixTransferDB {
    pub id: String,
    pub end_to_end_id: String,
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub direction: String,
    pub status: String,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

// Conversion implementations
impl TryFrom<PixKeyDB> for PixKey {
    type Error = PixError;

    fn try_from(db: PixKeyDB) -> Result<Self> {
        Ok(Self {
            key_type: PixKeyType::from_str(&db.key_type)?,
            id: db.id,
            account_id: db.account_id,
            value: db.value,
            is_primary: db.is_primary,
            created_at: db.created_at,
        })
    }
}

impl From<PixTransferDB> for PixTransfer {
    fn from(db: PixTransferDB) -> Self {
        Self {
            direction: if db.direction == PIX_DIRECTION_IN {
                PixDirection::In
            } else {
                PixDirection::Out
            },
            id: db.id,
            end_to_end_id: db.end_to_end_id,
            from_account_id: db.from_account_id,
            to_account_id: db.to_account_id,
            amount_cents: db.amount_cents,
            description: db.description,
            status: db.status,
            completed_at: db.completed_at,
            created_at: db.created_at,
        }
    }
}
