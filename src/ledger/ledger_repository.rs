use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::constants::{LEDGER_DEFAULT_PAGE_SIZE, LEDGER_DEFAULT_SINCE_DAYS, LEDGER_MAX_PAGE_SIZE};
use crate::db::get_connection;
use crate::ledger::{LedgerError, Result};
use crate::schema::{accounts, ledger_entries};

use super::ledger_constants::*;
use super::ledger_model::{EntryFilter, EntryKindFilter, EntryPage, LedgerEntry, LedgerEntryDB};

/// Repository for ledger entries
pub struct LedgerRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Inserts an entry as part of an enclosing transaction
    pub fn insert_in_tx(conn: &mut SqliteConnection, entry: &LedgerEntryDB) -> Result<()> {
        diesel::insert_into(ledger_entries::table)
            .values(entry)
            .execute(conn)?;
        Ok(())
    }

    /// Lists entries where the account is source or destination, newest
    /// first, with keyset pagination on (created_at, id).
    pub fn list(&self, account_id: &str, filter: &EntryFilter) -> Result<EntryPage> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| LedgerError::DatabaseError(e.to_string()))?;

        let limit = filter
            .limit
            .unwrap_or(LEDGER_DEFAULT_PAGE_SIZE)
            .clamp(1, LEDGER_MAX_PAGE_SIZE);

        let mut query = ledger_entries::table.into_boxed();

        query = query.filter(
            ledger_entries::from_account_id
                .eq(account_id.to_string())
                .or(ledger_entries::to_account_id.eq(account_id.to_string())),
        );

        match filter.kind {
            EntryKindFilter::All => {}
            EntryKindFilter::Incoming => {
                query = query.filter(
                    ledger_entries::to_account_id.eq(account_id.to_string()).and(
                        ledger_entries::kind
                            .eq(LEDGER_KIND_DEPOSIT)
                            .or(ledger_entries::kind.eq(LEDGER_KIND_TRANSFER)),
                    ),
                );
            }
            EntryKindFilter::Outgoing => {
                query = query.filter(
                    ledger_entries::from_account_id
                        .eq(account_id.to_string())
                        .and(
                            ledger_entries::kind
                                .eq(LEDGER_KIND_WITHDRAW)
                                .or(ledger_entries::kind.eq(LEDGER_KIND_TRANSFER)),
                        ),
                );
            }
            EntryKindFilter::Kind(kind) => {
                query = query.filter(ledger_entries::kind.eq(kind.as_str()));
            }
        }

        let since_days = filter.since_days.unwrap_or(LEDGER_DEFAULT_SINCE_DAYS);
        if since_days > 0 {
            let since = chrono::Utc::now().naive_utc() - chrono::Duration::days(since_days);
            query = query.filter(ledger_entries::created_at.ge(since));
        }

        if let Some(q) = filter.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", q);
            // Counterparty search goes through account numbers
            let matching_ids: Vec<String> = accounts::table
                .filter(accounts::number.like(pattern.clone()))
                .select(accounts::id)
                .load(&mut conn)?;
            query = query.filter(
                ledger_entries::note
                    .like(pattern)
                    .or(ledger_entries::from_account_id.eq_any(matching_ids.clone()))
                    .or(ledger_entries::to_account_id.eq_any(matching_ids)),
            );
        }

        if let Some(cursor_id) = &filter.cursor {
            if let Some(cursor_row) = ledger_entries::table
                .find(cursor_id)
                .first::<LedgerEntryDB>(&mut conn)
                .optional()?
            {
                query = query.filter(
                    ledger_entries::created_at.lt(cursor_row.created_at).or(
                        ledger_entries::created_at
                            .eq(cursor_row.created_at)
                            .and(ledger_entries::id.lt(cursor_row.id)),
                    ),
                );
            }
        }

        let mut rows = query
            .order((
                ledger_entries::created_at.desc(),
                ledger_entries::id.desc(),
            ))
            .limit(limit + 1)
            .load::<LedgerEntryDB>(&mut conn)?;

        let next_cursor = if rows.len() as i64 > limit {
            rows.truncate(limit as usize);
            rows.last().map(|r| r.id.clone())
        } else {
            None
        };

        Ok(EntryPage {
            items: rows.into_iter().map(LedgerEntry::from).collect(),
            next_cursor,
        })
    }
}
