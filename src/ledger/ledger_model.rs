use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ledger_constants::*;

/// Enum representing the kind of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerKind {
    Deposit,
    Withdraw,
    Transfer,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::Deposit => LEDGER_KIND_DEPOSIT,
            LedgerKind::Withdraw => LEDGER_KIND_WITHDRAW,
            LedgerKind::Transfer => LEDGER_KIND_TRANSFER,
        }
    }
}

impl FromStr for LedgerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            LEDGER_KIND_DEPOSIT => Ok(LedgerKind::Deposit),
            LEDGER_KIND_WITHDRAW => Ok(LedgerKind::Withdraw),
            LEDGER_KIND_TRANSFER => Ok(LedgerKind::Transfer),
            _ => Err(format!("Unknown ledger kind: {}", s)),
        }
    }
}

/// Domain model for one ledger movement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub kind: LedgerKind,
    pub amount_cents: i64,
    pub note: Option<String>,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Direction/kind filter for entry listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryKindFilter {
    #[default]
    All,
    /// Entries crediting the account (deposits and incoming transfers)
    Incoming,
    /// Entries debiting the account (withdrawals and outgoing transfers)
    Outgoing,
    Kind(LedgerKind),
}

/// Listing filter; defaults mirror the statement screen
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub kind: EntryKindFilter,
    /// 0 disables the time window
    pub since_days: Option<i64>,
    /// Substring match on note or counterparty account number
    pub query: Option<String>,
    pub limit: Option<i64>,
    /// Id of the last entry of the previous page
    pub cursor: Option<String>,
}

/// One page of entries plus the cursor for the next one
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPage {
    pub items: Vec<LedgerEntry>,
    pub next_cursor: Option<String>,
}

/// Database model for ledger entries
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::ledger_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LedgerEntryDB {
    pub id: String,
    pub kind: String,
    pub amount_cents: i64,
    pub note: Option<String>,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<LedgerEntryDB> for LedgerEntry {
    fn from(db: LedgerEntryDB) -> Self {
        Self {
            kind: LedgerKind::from_str(&db.kind).unwrap_or(LedgerKind::Transfer),
            id: db.id,
            amount_cents: db.amount_cents,
            note: db.note,
            from_account_id: db.from_account_id,
            to_account_id: db.to_account_id,
            created_at: db.created_at,
        }
    }
}
