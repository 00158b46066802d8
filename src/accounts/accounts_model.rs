use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Domain model representing a checking account.
///
/// Balances are integer minor units (cents); display conversion happens only
/// at the presentation edge.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub owner_id: String,
    pub agency: String,
    pub number: String,
    pub balance_cents: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for accounts
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub owner_id: String,
    pub agency: String,
    pub number: String,
    pub balance_cents: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations
impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            id: db.id,
            owner_id: db.owner_id,
            agency: db.agency,
            number: db.number,
            balance_cents: db.balance_cents,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
