mod common;

use common::{create_test_pool, register_user};

use minibanco_core::accounts::AccountService;
use minibanco_core::investments::{
    BuyRequest, InvestmentError, InvestmentService, PositionStatus, RedemptionKind,
};
use minibanco_core::ledger::LedgerService;

async fn funded_account(pool: &std::sync::Arc<minibanco_core::db::DbPool>, cents: i64) -> String {
    let profile = register_user(pool, "Ana Souza", "52998224725").await;
    if cents > 0 {
        LedgerService::new(pool.clone())
            .deposit(&profile.account.id, cents, None)
            .await
            .expect("deposit");
    }
    profile.account.id
}

fn product_id(service: &InvestmentService, code: &str) -> String {
    service
        .list_products()
        .expect("list products")
        .into_iter()
        .find(|p| p.code == code)
        .expect("seeded product")
        .id
}

#[tokio::test]
async fn seeding_is_idempotent_and_ordered_by_rate() {
    let pool = create_test_pool();
    let investments = InvestmentService::new(pool.clone());

    investments.seed_products().expect("first seed");
    investments.seed_products().expect("second seed");

    let products = investments.list_products().expect("list");
    assert_eq!(products.len(), 3);
    assert!(products.windows(2).all(|w| w[0].minute_rate_ppm <= w[1].minute_rate_ppm));
    assert!(products.iter().any(|p| p.code == "CDB-FLEX"));
}

#[tokio::test]
async fn buy_debits_the_balance_and_opens_an_active_position() {
    let pool = create_test_pool();
    let account_id = funded_account(&pool, 20_000).await;

    let investments = InvestmentService::new(pool.clone());
    investments.seed_products().expect("seed");
    let product = product_id(&investments, "CDB-FLEX");

    let view = investments
        .buy(BuyRequest {
            account_id: account_id.clone(),
            product_id: product,
            amount_cents: 5_000,
        })
        .await
        .expect("buy");
    assert_eq!(view.status, PositionStatus::Active);
    assert_eq!(view.principal_cents, 5_000);
    assert!(view.current_cents >= 5_000);

    let accounts = AccountService::new(pool.clone());
    assert_eq!(accounts.get_balance(&account_id).unwrap(), 15_000);

    let positions = investments.list_positions(&account_id).expect("list");
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].product.code, "CDB-FLEX");
}

#[tokio::test]
async fn minimum_is_checked_before_the_balance() {
    let pool = create_test_pool();
    let account_id = funded_account(&pool, 0).await;

    let investments = InvestmentService::new(pool.clone());
    investments.seed_products().expect("seed");
    let product = product_id(&investments, "CDB-FLEX");

    // Below the 5_000 minimum on an empty account: the minimum wins
    let result = investments
        .buy(BuyRequest {
            account_id,
            product_id: product,
            amount_cents: 4_000,
        })
        .await;
    assert!(matches!(
        result,
        Err(InvestmentError::BelowMinimum {
            min_amount_cents: 5_000
        })
    ));
}

#[tokio::test]
async fn buy_without_funds_leaves_no_position_behind() {
    let pool = create_test_pool();
    let account_id = funded_account(&pool, 1_000).await;

    let investments = InvestmentService::new(pool.clone());
    investments.seed_products().expect("seed");
    let product = product_id(&investments, "CDB-FLEX");

    let result = investments
        .buy(BuyRequest {
            account_id: account_id.clone(),
            product_id: product,
            amount_cents: 5_000,
        })
        .await;
    assert!(matches!(
        result,
        Err(InvestmentError::InsufficientFunds { .. })
    ));

    let accounts = AccountService::new(pool.clone());
    assert_eq!(accounts.get_balance(&account_id).unwrap(), 1_000);
    assert!(investments.list_positions(&account_id).unwrap().is_empty());
}

#[tokio::test]
async fn zero_liquidity_product_redeems_in_full_right_away() {
    let pool = create_test_pool();
    let account_id = funded_account(&pool, 5_000).await;

    let investments = InvestmentService::new(pool.clone());
    investments.seed_products().expect("seed");
    let product = product_id(&investments, "CDB-FLEX");

    let view = investments
        .buy(BuyRequest {
            account_id: account_id.clone(),
            product_id: product,
            amount_cents: 5_000,
        })
        .await
        .expect("buy");

    // No time has accrued, so there is no gain and no fee
    let redemption = investments
        .redeem(&account_id, &view.id, None)
        .await
        .expect("redeem");
    assert_eq!(redemption.kind, RedemptionKind::Full);
    assert_eq!(redemption.gross_cents, 5_000);
    assert_eq!(redemption.fee_cents, 0);
    assert_eq!(redemption.net_cents, 5_000);

    let accounts = AccountService::new(pool.clone());
    assert_eq!(accounts.get_balance(&account_id).unwrap(), 5_000);

    let positions = investments.list_positions(&account_id).expect("list");
    assert_eq!(positions[0].status, PositionStatus::Closed);
    assert_eq!(positions[0].redeemed_cents, Some(5_000));

    // A closed position cannot be redeemed again
    let again = investments.redeem(&account_id, &view.id, None).await;
    assert!(matches!(again, Err(InvestmentError::NotActive)));
}

#[tokio::test]
async fn partial_redemption_keeps_the_position_accruing() {
    let pool = create_test_pool();
    let account_id = funded_account(&pool, 5_000).await;

    let investments = InvestmentService::new(pool.clone());
    investments.seed_products().expect("seed");
    let product = product_id(&investments, "CDB-FLEX");

    let view = investments
        .buy(BuyRequest {
            account_id: account_id.clone(),
            product_id: product,
            amount_cents: 5_000,
        })
        .await
        .expect("buy");

    let redemption = investments
        .redeem(&account_id, &view.id, Some(2_000))
        .await
        .expect("redeem");
    assert_eq!(redemption.kind, RedemptionKind::Partial);
    assert_eq!(redemption.gross_cents, 2_000);
    assert_eq!(redemption.fee_cents, 0);
    assert_eq!(redemption.net_cents, 2_000);
    assert_eq!(redemption.remaining_current_cents, 3_000);

    let accounts = AccountService::new(pool.clone());
    assert_eq!(accounts.get_balance(&account_id).unwrap(), 2_000);

    // The remainder stays ACTIVE with the locked-in value as its new
    // principal and a restarted accrual clock
    let positions = investments.list_positions(&account_id).expect("list");
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].status, PositionStatus::Active);
    assert_eq!(positions[0].principal_cents, 3_000);
    assert!(positions[0].opened_at >= view.opened_at);
    assert!(positions[0].closed_at.is_none());

    // And it can still be settled in full afterwards
    let rest = investments
        .redeem(&account_id, &view.id, None)
        .await
        .expect("redeem remainder");
    assert_eq!(rest.kind, RedemptionKind::Full);
    assert!(rest.gross_cents >= 3_000);
    assert!(accounts.get_balance(&account_id).unwrap() >= 5_000 - rest.fee_cents);
}

#[tokio::test]
async fn liquidity_window_blocks_an_early_redemption() {
    let pool = create_test_pool();
    let account_id = funded_account(&pool, 10_000).await;

    let investments = InvestmentService::new(pool.clone());
    investments.seed_products().expect("seed");
    let product = product_id(&investments, "CDB-PLUS");

    let view = investments
        .buy(BuyRequest {
            account_id: account_id.clone(),
            product_id: product,
            amount_cents: 10_000,
        })
        .await
        .expect("buy");

    // The error names the product's full liquidity window
    let result = investments.redeem(&account_id, &view.id, None).await;
    match result {
        Err(InvestmentError::LiquidityWindow(minutes)) => assert_eq!(minutes, 2),
        other => panic!("expected liquidity window error, got {:?}", other),
    }

    // Nothing moved
    let accounts = AccountService::new(pool.clone());
    assert_eq!(accounts.get_balance(&account_id).unwrap(), 0);
    let positions = investments.list_positions(&account_id).expect("list");
    assert_eq!(positions[0].status, PositionStatus::Active);
}

#[tokio::test]
async fn only_closed_positions_can_be_deleted() {
    let pool = create_test_pool();
    let account_id = funded_account(&pool, 5_000).await;

    let investments = InvestmentService::new(pool.clone());
    investments.seed_products().expect("seed");
    let product = product_id(&investments, "CDB-FLEX");

    let view = investments
        .buy(BuyRequest {
            account_id: account_id.clone(),
            product_id: product,
            amount_cents: 5_000,
        })
        .await
        .expect("buy");

    let blocked = investments.delete_position(&account_id, &view.id);
    assert!(matches!(blocked, Err(InvestmentError::NotClosed)));

    investments
        .redeem(&account_id, &view.id, None)
        .await
        .expect("redeem");
    investments
        .delete_position(&account_id, &view.id)
        .expect("delete closed");
    assert!(investments.list_positions(&account_id).unwrap().is_empty());
}

#[tokio::test]
async fn cleanup_removes_every_closed_position() {
    let pool = create_test_pool();
    let account_id = funded_account(&pool, 15_000).await;

    let investments = InvestmentService::new(pool.clone());
    investments.seed_products().expect("seed");
    let product = product_id(&investments, "CDB-FLEX");

    for _ in 0..2 {
        let view = investments
            .buy(BuyRequest {
                account_id: account_id.clone(),
                product_id: product.clone(),
                amount_cents: 5_000,
            })
            .await
            .expect("buy");
        investments
            .redeem(&account_id, &view.id, None)
            .await
            .expect("redeem");
    }
    // One position stays open
    investments
        .buy(BuyRequest {
            account_id: account_id.clone(),
            product_id: product.clone(),
            amount_cents: 5_000,
        })
        .await
        .expect("buy");

    let removed = investments.cleanup_closed(&account_id).expect("cleanup");
    assert_eq!(removed, 2);

    let positions = investments.list_positions(&account_id).expect("list");
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].status, PositionStatus::Active);
}

#[tokio::test]
async fn positions_of_another_account_stay_out_of_reach() {
    let pool = create_test_pool();
    let ana = register_user(&pool, "Ana Souza", "52998224725").await;
    let rui = register_user(&pool, "Rui Costa", "12345678909").await;

    let ledger = LedgerService::new(pool.clone());
    ledger.deposit(&ana.account.id, 5_000, None).await.expect("deposit");

    let investments = InvestmentService::new(pool.clone());
    investments.seed_products().expect("seed");
    let product = product_id(&investments, "CDB-FLEX");

    let view = investments
        .buy(BuyRequest {
            account_id: ana.account.id.clone(),
            product_id: product,
            amount_cents: 5_000,
        })
        .await
        .expect("buy");

    let stolen = investments.redeem(&rui.account.id, &view.id, None).await;
    assert!(matches!(stolen, Err(InvestmentError::NotFound(_))));
}
