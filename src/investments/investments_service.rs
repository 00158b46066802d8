use chrono::NaiveDateTime;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::str::FromStr;
use std::sync::Arc;

use super::accrual::{compound_by_minutes, diff_minutes, plan_redemption};
use super::investments_model::{
    BuyRequest, InvestmentPositionDB, InvestmentProduct, InvestmentProductDB, PositionStatus,
    PositionView, ProductSeed, Redemption, RedemptionKind,
};
use super::investments_repository::InvestmentRepository;
use crate::accounts::AccountRepository;
use crate::db::DbTransactionExecutor;
use crate::investments::{InvestmentError, Result};

/// Default catalog, upserted by code at startup
const PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed {
        code: "CDB-FLEX",
        name: "CDB Flex",
        description: "Daily liquidity, redeem whenever you want",
        minute_rate_ppm: 2_500,
        min_amount_cents: 5_000,
        liquidity_minutes: 0,
    },
    ProductSeed {
        code: "CDB-PLUS",
        name: "CDB Plus",
        description: "Better rate for a short lock-up",
        minute_rate_ppm: 4_300,
        min_amount_cents: 10_000,
        liquidity_minutes: 2,
    },
    ProductSeed {
        code: "CDB-TURBO",
        name: "CDB Turbo",
        description: "Top rate, longest lock-up",
        minute_rate_ppm: 6_800,
        min_amount_cents: 10_000,
        liquidity_minutes: 3,
    },
];

/// Service for the investment catalog and position lifecycle. Values accrue
/// by discrete per-minute compounding and are always computed on read,
/// never stored.
pub struct InvestmentService {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl InvestmentService {
    /// Creates a new InvestmentService instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Upserts the default catalog. Safe to call on every startup; open
    /// positions keep their product attachment.
    pub fn seed_products(&self) -> Result<()> {
        let repo = InvestmentRepository::new(self.pool.clone());
        for seed in PRODUCT_SEEDS {
            repo.upsert_product(seed)?;
        }
        Ok(())
    }

    /// Lists the catalog, cheapest rate first
    pub fn list_products(&self) -> Result<Vec<InvestmentProduct>> {
        let repo = InvestmentRepository::new(self.pool.clone());
        let rows = repo.list_products()?;
        Ok(rows.into_iter().map(InvestmentProduct::from).collect())
    }

    /// Opens a position. The product minimum is enforced before any balance
    /// check; the debit and the position row apply atomically.
    pub async fn buy(&self, request: BuyRequest) -> Result<PositionView> {
        request.validate()?;

        let repo = InvestmentRepository::new(self.pool.clone());
        let product = repo.get_product(&request.product_id)?;
        if request.amount_cents < product.min_amount_cents {
            return Err(InvestmentError::BelowMinimum {
                min_amount_cents: product.min_amount_cents,
            });
        }

        let now = chrono::Utc::now().naive_utc();
        let position = InvestmentPositionDB {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: request.account_id.clone(),
            product_id: product.id.clone(),
            principal_cents: request.amount_cents,
            opened_at: now,
            status: PositionStatus::Active.as_str().to_string(),
            closed_at: None,
            redeemed_cents: None,
            created_at: now,
            updated_at: now,
        };
        debug!(
            "Opening position of {} cents in {} for account {}",
            request.amount_cents, product.code, request.account_id
        );

        self.pool.execute(|conn| {
            AccountRepository::debit_in_tx(conn, &request.account_id, request.amount_cents)?;
            InvestmentRepository::insert_position_in_tx(conn, &position)?;
            Ok::<_, InvestmentError>(())
        })?;

        build_view(position, product, now)
    }

    /// Lists the account's positions with values accrued up to now
    pub fn list_positions(&self, account_id: &str) -> Result<Vec<PositionView>> {
        let repo = InvestmentRepository::new(self.pool.clone());
        let now = chrono::Utc::now().naive_utc();

        repo.list_positions(account_id)?
            .into_iter()
            .map(|(position, product)| build_view(position, product, now))
            .collect()
    }

    /// Redeems `requested_cents` (everything when absent) out of an active
    /// position once its liquidity window has elapsed. A full redemption
    /// closes the position; a partial one locks in the accrued value as the
    /// new principal and restarts the clock. The net amount is credited to
    /// the account in the same transaction.
    pub async fn redeem(
        &self,
        account_id: &str,
        position_id: &str,
        requested_cents: Option<i64>,
    ) -> Result<Redemption> {
        let now = chrono::Utc::now().naive_utc();

        let redemption = self.pool.execute(|conn| {
            let position =
                InvestmentRepository::get_owned_position_in_tx(conn, position_id, account_id)?;
            if PositionStatus::from_str(&position.status)? != PositionStatus::Active {
                return Err(InvestmentError::NotActive);
            }

            let product = InvestmentRepository::get_product_in_tx(conn, &position.product_id)?;
            let elapsed = diff_minutes(position.opened_at, now);
            if elapsed < product.liquidity_minutes {
                return Err(InvestmentError::LiquidityWindow(product.liquidity_minutes));
            }

            let current = compound_by_minutes(
                position.principal_cents,
                product.minute_rate_ppm,
                elapsed,
            );
            let plan = plan_redemption(position.principal_cents, current, requested_cents);

            if plan.is_full {
                InvestmentRepository::close_position_in_tx(
                    conn,
                    position_id,
                    plan.value_to_redeem_cents,
                    now,
                )?;
            } else {
                InvestmentRepository::reset_position_in_tx(
                    conn,
                    position_id,
                    plan.remaining_current_cents,
                    now,
                )?;
            }
            if plan.net_cents > 0 {
                AccountRepository::credit_in_tx(conn, account_id, plan.net_cents)?;
            }

            Ok(Redemption {
                position_id: position_id.to_string(),
                kind: if plan.is_full {
                    RedemptionKind::Full
                } else {
                    RedemptionKind::Partial
                },
                gross_cents: plan.value_to_redeem_cents,
                fee_cents: plan.fee_cents,
                net_cents: plan.net_cents,
                remaining_current_cents: plan.remaining_current_cents,
                remaining_principal_cents: plan.remaining_principal_cents,
            })
        })?;

        debug!(
            "Redeemed {} cents gross ({} net) from position {}",
            redemption.gross_cents, redemption.net_cents, position_id
        );
        Ok(redemption)
    }

    /// Removes one closed position from the history
    pub fn delete_position(&self, account_id: &str, position_id: &str) -> Result<()> {
        let repo = InvestmentRepository::new(self.pool.clone());
        let position = repo.get_owned_position(position_id, account_id)?;
        if PositionStatus::from_str(&position.status)? != PositionStatus::Closed {
            return Err(InvestmentError::NotClosed);
        }
        repo.delete_position(position_id)
    }

    /// Clears the account's closed positions, returning how many were
    /// removed
    pub fn cleanup_closed(&self, account_id: &str) -> Result<usize> {
        let repo = InvestmentRepository::new(self.pool.clone());
        repo.delete_closed(account_id)
    }
}

/// Projects a stored position into its caller-facing shape. Active positions
/// get their value accrued up to `at`; closed ones show what was settled.
fn build_view(
    position: InvestmentPositionDB,
    product: InvestmentProductDB,
    at: NaiveDateTime,
) -> Result<PositionView> {
    let status = PositionStatus::from_str(&position.status)?;

    let current_cents = match status {
        PositionStatus::Active => compound_by_minutes(
            position.principal_cents,
            product.minute_rate_ppm,
            diff_minutes(position.opened_at, at),
        ),
        PositionStatus::Closed => position.redeemed_cents.unwrap_or(position.principal_cents),
    };

    Ok(PositionView {
        id: position.id,
        account_id: position.account_id,
        status,
        principal_cents: position.principal_cents,
        current_cents,
        gain_cents: (current_cents - position.principal_cents).max(0),
        opened_at: position.opened_at,
        closed_at: position.closed_at,
        redeemed_cents: position.redeemed_cents,
        product: InvestmentProduct::from(product),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_product(rate_ppm: i64, liquidity: i64) -> InvestmentProductDB {
        let now = chrono::Utc::now().naive_utc();
        InvestmentProductDB {
            id: "prod-1".to_string(),
            code: "CDB-TEST".to_string(),
            name: "CDB Test".to_string(),
            description: String::new(),
            minute_rate_ppm: rate_ppm,
            min_amount_cents: 5_000,
            liquidity_minutes: liquidity,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_position(principal: i64, opened_at: NaiveDateTime) -> InvestmentPositionDB {
        InvestmentPositionDB {
            id: "pos-1".to_string(),
            account_id: "acc-1".to_string(),
            product_id: "prod-1".to_string(),
            principal_cents: principal,
            opened_at,
            status: PositionStatus::Active.as_str().to_string(),
            closed_at: None,
            redeemed_cents: None,
            created_at: opened_at,
            updated_at: opened_at,
        }
    }

    #[test]
    fn seed_catalog_is_ordered_and_well_formed() {
        let mut previous_rate = 0;
        for seed in PRODUCT_SEEDS {
            assert!(seed.minute_rate_ppm > previous_rate);
            assert!(seed.min_amount_cents > 0);
            assert!(seed.liquidity_minutes >= 0);
            previous_rate = seed.minute_rate_ppm;
        }
        assert_eq!(PRODUCT_SEEDS.len(), 3);
    }

    #[test]
    fn active_view_accrues_since_opening() {
        let opened = chrono::Utc::now().naive_utc();
        let view = build_view(
            sample_position(10_000, opened),
            sample_product(800, 0),
            opened + Duration::minutes(10),
        )
        .unwrap();

        assert_eq!(view.current_cents, 10_080);
        assert_eq!(view.gain_cents, 80);
        assert_eq!(view.status, PositionStatus::Active);
    }

    #[test]
    fn closed_view_shows_settled_value() {
        let opened = chrono::Utc::now().naive_utc();
        let mut position = sample_position(10_000, opened);
        position.status = PositionStatus::Closed.as_str().to_string();
        position.redeemed_cents = Some(10_080);
        position.closed_at = Some(opened + Duration::minutes(10));

        // A closed position no longer accrues, however much later we look
        let view = build_view(position, sample_product(800, 0), opened + Duration::days(30))
            .unwrap();
        assert_eq!(view.current_cents, 10_080);
        assert_eq!(view.gain_cents, 80);
    }

    #[test]
    fn view_rejects_unknown_status() {
        let opened = chrono::Utc::now().naive_utc();
        let mut position = sample_position(10_000, opened);
        position.status = "LIMBO".to_string();

        assert!(build_view(position, sample_product(800, 0), opened).is_err());
    }
}
