mod common;

use common::{create_test_pool, register_user};

use minibanco_core::accounts::AccountService;
use minibanco_core::ledger::{EntryFilter, LedgerError, LedgerKind, LedgerService};
use minibanco_core::pix::{NewPixKey, PixDirection, PixError, PixKeyType, PixSendRequest, PixService};
use minibanco_core::users::{RegisterUser, UserService};

#[tokio::test]
async fn register_opens_account_and_login_verifies_password() {
    let pool = create_test_pool();
    let profile = register_user(&pool, "Ana Souza", "529.982.247-25").await;

    assert_eq!(profile.account.agency, "0001");
    assert_eq!(profile.account.balance_cents, 0);
    let (digits, _dv) = profile.account.number.split_once('-').expect("check digit");
    assert_eq!(digits.len(), 6);

    let users = UserService::new(pool.clone());
    let logged = users.login("52998224725", "secret1").expect("login");
    assert_eq!(logged.user.id, profile.user.id);

    assert!(users.login("52998224725", "wrong-password").is_err());
}

#[tokio::test]
async fn duplicate_cpf_is_rejected() {
    let pool = create_test_pool();
    register_user(&pool, "Ana Souza", "52998224725").await;

    let users = UserService::new(pool.clone());
    let result = users
        .register(RegisterUser {
            name: "Outra Ana".to_string(),
            cpf: "529.982.247-25".to_string(),
            password: "secret2".to_string(),
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn deposit_and_withdraw_move_the_balance() {
    let pool = create_test_pool();
    let profile = register_user(&pool, "Ana Souza", "52998224725").await;
    let account_id = profile.account.id.clone();

    let ledger = LedgerService::new(pool.clone());
    let accounts = AccountService::new(pool.clone());

    ledger
        .deposit(&account_id, 10_000, Some("first deposit".to_string()))
        .await
        .expect("deposit");
    assert_eq!(accounts.get_balance(&account_id).unwrap(), 10_000);

    ledger.withdraw(&account_id, 4_000, None).await.expect("withdraw");
    assert_eq!(accounts.get_balance(&account_id).unwrap(), 6_000);
}

#[tokio::test]
async fn overdraft_fails_without_touching_the_balance() {
    let pool = create_test_pool();
    let profile = register_user(&pool, "Ana Souza", "52998224725").await;
    let account_id = profile.account.id.clone();

    let ledger = LedgerService::new(pool.clone());
    ledger.deposit(&account_id, 1_000, None).await.expect("deposit");

    let result = ledger.withdraw(&account_id, 5_000, None).await;
    assert!(matches!(result, Err(LedgerError::InsufficientFunds)));

    let accounts = AccountService::new(pool.clone());
    assert_eq!(accounts.get_balance(&account_id).unwrap(), 1_000);

    // The failed attempt left no ledger entry behind
    let page = ledger
        .list_entries(&account_id, &EntryFilter::default())
        .expect("list");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].kind, LedgerKind::Deposit);
}

#[tokio::test]
async fn transfer_debits_and_credits_atomically() {
    let pool = create_test_pool();
    let ana = register_user(&pool, "Ana Souza", "52998224725").await;
    let rui = register_user(&pool, "Rui Costa", "12345678909").await;

    let ledger = LedgerService::new(pool.clone());
    let accounts = AccountService::new(pool.clone());
    ledger.deposit(&ana.account.id, 10_000, None).await.expect("deposit");

    let entry = ledger
        .transfer(&ana.account.id, &rui.account.number, 3_500, None)
        .await
        .expect("transfer");
    assert_eq!(entry.kind, LedgerKind::Transfer);
    assert_eq!(accounts.get_balance(&ana.account.id).unwrap(), 6_500);
    assert_eq!(accounts.get_balance(&rui.account.id).unwrap(), 3_500);
}

#[tokio::test]
async fn transfer_to_own_account_is_rejected() {
    let pool = create_test_pool();
    let ana = register_user(&pool, "Ana Souza", "52998224725").await;

    let ledger = LedgerService::new(pool.clone());
    ledger.deposit(&ana.account.id, 10_000, None).await.expect("deposit");

    let result = ledger
        .transfer(&ana.account.id, &ana.account.number, 1_000, None)
        .await;
    assert!(matches!(result, Err(LedgerError::SelfTransfer)));
}

#[tokio::test]
async fn statement_pages_newest_first_through_the_cursor() {
    let pool = create_test_pool();
    let profile = register_user(&pool, "Ana Souza", "52998224725").await;
    let account_id = profile.account.id.clone();

    let ledger = LedgerService::new(pool.clone());
    for amount in [100, 200, 300] {
        ledger
            .deposit(&account_id, amount, None)
            .await
            .expect("deposit");
    }

    let first = ledger
        .list_entries(
            &account_id,
            &EntryFilter {
                limit: Some(2),
                ..Default::default()
            },
        )
        .expect("first page");
    assert_eq!(first.items.len(), 2);
    let cursor = first.next_cursor.clone().expect("cursor for next page");

    let second = ledger
        .list_entries(
            &account_id,
            &EntryFilter {
                limit: Some(2),
                cursor: Some(cursor),
                ..Default::default()
            },
        )
        .expect("second page");
    assert_eq!(second.items.len(), 1);
    assert!(second.next_cursor.is_none());

    // No entry repeats across pages
    assert!(first.items.iter().all(|e| e.id != second.items[0].id));
}

#[tokio::test]
async fn pix_key_registration_is_globally_unique() {
    let pool = create_test_pool();
    let ana = register_user(&pool, "Ana Souza", "52998224725").await;
    let rui = register_user(&pool, "Rui Costa", "12345678909").await;

    let pix = PixService::new(pool.clone());
    let key = pix
        .create_key(NewPixKey {
            account_id: ana.account.id.clone(),
            key_type: PixKeyType::Email,
            value: Some("Ana@Example.com".to_string()),
            set_primary: true,
        })
        .await
        .expect("create key");
    assert_eq!(key.value, "ana@example.com");
    assert!(key.is_primary);

    // Same key on another account
    let duplicate = pix
        .create_key(NewPixKey {
            account_id: rui.account.id.clone(),
            key_type: PixKeyType::Email,
            value: Some("ana@example.com".to_string()),
            set_primary: false,
        })
        .await;
    assert!(matches!(duplicate, Err(PixError::KeyAlreadyRegistered)));
}

#[tokio::test]
async fn pix_send_writes_both_directions_and_a_ledger_entry() {
    let pool = create_test_pool();
    let ana = register_user(&pool, "Ana Souza", "52998224725").await;
    let rui = register_user(&pool, "Rui Costa", "12345678909").await;

    let ledger = LedgerService::new(pool.clone());
    ledger.deposit(&ana.account.id, 10_000, None).await.expect("deposit");

    let pix = PixService::new(pool.clone());
    pix.create_key(NewPixKey {
        account_id: rui.account.id.clone(),
        key_type: PixKeyType::Phone,
        value: Some("(11) 98888-7777".to_string()),
        set_primary: false,
    })
    .await
    .expect("create key");

    let transfer = pix
        .send(PixSendRequest {
            from_account_id: ana.account.id.clone(),
            key_type: PixKeyType::Phone,
            key: "11988887777".to_string(),
            amount_cents: 2_500,
            note: None,
        })
        .await
        .expect("pix send");
    assert!(transfer.end_to_end_id.starts_with("E2E-"));

    let accounts = AccountService::new(pool.clone());
    assert_eq!(accounts.get_balance(&ana.account.id).unwrap(), 7_500);
    assert_eq!(accounts.get_balance(&rui.account.id).unwrap(), 2_500);

    // One OUT row for the sender, one IN row for the receiver, same e2e id
    let outgoing = pix
        .list_transfers(&ana.account.id, Some(PixDirection::Out))
        .expect("outgoing");
    let incoming = pix
        .list_transfers(&rui.account.id, Some(PixDirection::In))
        .expect("incoming");
    assert_eq!(outgoing.len(), 1);
    assert_eq!(incoming.len(), 1);
    assert_eq!(outgoing[0].end_to_end_id, incoming[0].end_to_end_id);

    // The movement also shows up in the sender's statement
    let page = ledger
        .list_entries(&ana.account.id, &EntryFilter::default())
        .expect("list");
    assert!(page.items.iter().any(|e| e.kind == LedgerKind::Transfer));
}

#[tokio::test]
async fn pix_send_to_unknown_key_fails_clean() {
    let pool = create_test_pool();
    let ana = register_user(&pool, "Ana Souza", "52998224725").await;

    let ledger = LedgerService::new(pool.clone());
    ledger.deposit(&ana.account.id, 10_000, None).await.expect("deposit");

    let pix = PixService::new(pool.clone());
    let result = pix
        .send(PixSendRequest {
            from_account_id: ana.account.id.clone(),
            key_type: PixKeyType::Email,
            key: "nobody@example.com".to_string(),
            amount_cents: 1_000,
            note: None,
        })
        .await;
    assert!(matches!(result, Err(PixError::NotFound(_))));

    let accounts = AccountService::new(pool.clone());
    assert_eq!(accounts.get_balance(&ana.account.id).unwrap(), 10_000);
}
