// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use vaultledger::db;
use vaultledger::idgen::IdGenerator;
use vaultledger::ledger::{
    self, FeesOption, PaypalRequest, TransferRequest, TransferType, WireTransferRequest,
};
use vaultledger::models::TransactionStatus;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO customers(name, email) VALUES('Ada Lovelace', 'ada@example.com')",
        [],
    )
    .unwrap();
    conn
}

fn seed_account(conn: &Connection, number: &str, balance: &str) -> i64 {
    conn.execute(
        "INSERT INTO accounts(customer_id, balance, currency, status, account_number, routing_number, swift_bic, iban, sort_code, pin)
         VALUES (1, ?1, 'USD', 'active', ?2, '011000056', 'CHASUS33', 'US33CHAS0000123456', '20-11-45', '7294')",
        params![balance, number],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn balance_of(conn: &Connection, id: i64) -> Decimal {
    let s: String = conn
        .query_row(
            "SELECT balance FROM accounts WHERE id=?1",
            params![id],
            |r| r.get(0),
        )
        .unwrap();
    s.parse().unwrap()
}

fn transfer_to(number: &str, from: i64, amount: i64) -> TransferRequest {
    TransferRequest {
        from_account_id: from,
        pin: "7294".to_string(),
        amount: Decimal::from(amount),
        country: "US".to_string(),
        account_number: number.to_string(),
        recipient_name: "Grace Hopper".to_string(),
        ..Default::default()
    }
}

#[test]
fn internal_transfer_moves_both_balances_and_settles_completed() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let x = seed_account(&conn, "111111111", "100");
    let y = seed_account(&conn, "222222222", "10");

    let res = ledger::transfer(&mut conn, &mut ids, &transfer_to("222222222", x, 40)).unwrap();

    assert!(res.success);
    assert_eq!(res.status, TransactionStatus::Completed);
    assert_eq!(res.balance, Some(Decimal::from(60)));
    assert_eq!(balance_of(&conn, x), Decimal::from(60));
    assert_eq!(balance_of(&conn, y), Decimal::from(50));
    // money is conserved across the pair
    assert_eq!(
        balance_of(&conn, x) + balance_of(&conn, y),
        Decimal::from(110)
    );

    let to_id: Option<i64> = conn
        .query_row(
            "SELECT to_account_id FROM transactions WHERE id=?1",
            params![res.transaction_id.unwrap()],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(to_id, Some(y));
}

#[test]
fn transfer_to_the_same_account_is_rejected() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let x = seed_account(&conn, "111111111", "100");

    let res = ledger::transfer(&mut conn, &mut ids, &transfer_to("111111111", x, 40)).unwrap();
    assert!(!res.success);
    assert_eq!(balance_of(&conn, x), Decimal::from(100));
}

#[test]
fn domestic_transfer_to_an_unknown_account_settles_pending() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let x = seed_account(&conn, "111111111", "100");

    let res = ledger::transfer(&mut conn, &mut ids, &transfer_to("999999999", x, 40)).unwrap();
    assert!(res.success);
    assert_eq!(res.status, TransactionStatus::Pending);
    assert_eq!(balance_of(&conn, x), Decimal::from(60));

    let to_id: Option<i64> = conn
        .query_row(
            "SELECT to_account_id FROM transactions WHERE id=?1",
            params![res.transaction_id.unwrap()],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(to_id, None);
}

#[test]
fn international_transfer_never_resolves_locally() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let x = seed_account(&conn, "111111111", "100");
    let y = seed_account(&conn, "222222222", "10");

    let mut req = transfer_to("222222222", x, 40);
    req.transfer_type = Some(TransferType::International);
    req.country = "DE".to_string();
    let res = ledger::transfer(&mut conn, &mut ids, &req).unwrap();

    assert!(res.success);
    assert_eq!(res.status, TransactionStatus::Pending);
    // the local account holding the same number is not credited
    assert_eq!(balance_of(&conn, y), Decimal::from(10));
    assert_eq!(balance_of(&conn, x), Decimal::from(60));
}

#[test]
fn forced_status_overrides_the_computed_settlement() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let x = seed_account(&conn, "111111111", "100");

    let mut req = transfer_to("999999999", x, 40);
    req.forced_status = Some(TransactionStatus::Completed);
    let res = ledger::transfer(&mut conn, &mut ids, &req).unwrap();

    assert!(res.success);
    assert_eq!(res.status, TransactionStatus::Completed);
    let status: String = conn
        .query_row(
            "SELECT status FROM transactions WHERE id=?1",
            params![res.transaction_id.unwrap()],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(status, "completed");
}

#[test]
fn transfer_with_insufficient_funds_is_rejected() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let x = seed_account(&conn, "111111111", "30");
    let y = seed_account(&conn, "222222222", "10");

    let res = ledger::transfer(&mut conn, &mut ids, &transfer_to("222222222", x, 40)).unwrap();
    assert!(!res.success);
    assert_eq!(balance_of(&conn, x), Decimal::from(30));
    assert_eq!(balance_of(&conn, y), Decimal::from(10));
}

#[test]
fn persistence_failure_rolls_the_whole_unit_back() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let x = seed_account(&conn, "111111111", "100");
    let y = seed_account(&conn, "222222222", "10");

    // both balances are updated before the ledger row insert; dropping the
    // table makes that insert fail after the mutations
    conn.execute("DROP TABLE transactions", []).unwrap();
    let err = ledger::transfer(&mut conn, &mut ids, &transfer_to("222222222", x, 40));
    assert!(err.is_err());

    assert_eq!(balance_of(&conn, x), Decimal::from(100));
    assert_eq!(balance_of(&conn, y), Decimal::from(10));
}

#[test]
fn wire_fee_tiers() {
    let conn = setup();
    assert_eq!(ledger::wire_fee(&conn, "DE").unwrap(), ledger::WIRE_FEE_EURO_ZONE);
    assert_eq!(ledger::wire_fee(&conn, "fr").unwrap(), ledger::WIRE_FEE_EURO_ZONE);
    // default home country
    assert_eq!(ledger::wire_fee(&conn, "US").unwrap(), ledger::WIRE_FEE_DOMESTIC);
    assert_eq!(ledger::wire_fee(&conn, "JP").unwrap(), ledger::WIRE_FEE_INTERNATIONAL);

    vaultledger::utils::set_home_country(&conn, "GB").unwrap();
    assert_eq!(ledger::wire_fee(&conn, "GB").unwrap(), ledger::WIRE_FEE_DOMESTIC);
    assert_eq!(ledger::wire_fee(&conn, "US").unwrap(), ledger::WIRE_FEE_INTERNATIONAL);
}

#[test]
fn wire_deduction_by_fee_option() {
    let amount = Decimal::from(1000);
    let fee = Decimal::from(45);
    assert_eq!(
        ledger::wire_deduction(amount, fee, FeesOption::Beneficiary),
        Decimal::from(1045)
    );
    assert_eq!(
        ledger::wire_deduction(amount, fee, FeesOption::Sender),
        Decimal::from(1000)
    );
    assert_eq!(
        ledger::wire_deduction(amount, fee, FeesOption::Shared),
        amount + fee / Decimal::TWO
    );
}

#[test]
fn fees_option_parsing_keeps_legacy_spellings() {
    assert_eq!(FeesOption::parse("beneficiary"), FeesOption::Beneficiary);
    assert_eq!(FeesOption::parse("our"), FeesOption::Beneficiary);
    assert_eq!(FeesOption::parse("sender"), FeesOption::Sender);
    assert_eq!(FeesOption::parse("ben"), FeesOption::Sender);
    assert_eq!(FeesOption::parse("shared"), FeesOption::Shared);
    assert_eq!(FeesOption::parse("anything-else"), FeesOption::Shared);
}

fn wire_request(from: i64, amount: i64, country: &str, option: FeesOption) -> WireTransferRequest {
    WireTransferRequest {
        from_account_id: from,
        pin: "7294".to_string(),
        amount: Decimal::from(amount),
        beneficiary_name: "Grace Hopper".to_string(),
        beneficiary_account: "DE89370400440532013000".to_string(),
        beneficiary_bank_name: "Deutsche Bank".to_string(),
        beneficiary_bank_swift: "DEUTDEFF".to_string(),
        country: country.to_string(),
        iban: None,
        sort_code: None,
        routing_number: None,
        purpose: "invoice".to_string(),
        instructions: None,
        fees_option: option,
        send_receipt: false,
    }
}

#[test]
fn wire_transfer_settles_pending_and_deducts_amount_plus_fee() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let x = seed_account(&conn, "111111111", "2000");

    let res = ledger::wire_transfer(
        &mut conn,
        &mut ids,
        &wire_request(x, 1000, "DE", FeesOption::Beneficiary),
    )
    .unwrap();

    assert!(res.success);
    assert_eq!(res.status, TransactionStatus::Pending);
    assert_eq!(res.receiver_name.as_deref(), Some("Grace Hopper"));
    assert_eq!(res.receiver_bank.as_deref(), Some("Deutsche Bank"));
    // 1000 + the 15 euro-zone fee
    assert_eq!(balance_of(&conn, x), Decimal::from(985));
}

#[test]
fn wire_transfer_must_cover_amount_and_fee() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let x = seed_account(&conn, "111111111", "1010");

    // amount fits, amount + 15 fee does not
    let res = ledger::wire_transfer(
        &mut conn,
        &mut ids,
        &wire_request(x, 1000, "DE", FeesOption::Beneficiary),
    )
    .unwrap();
    assert!(!res.success);
    assert_eq!(balance_of(&conn, x), Decimal::from(1010));

    // sender option only needs the amount itself
    let res = ledger::wire_transfer(
        &mut conn,
        &mut ids,
        &wire_request(x, 1000, "DE", FeesOption::Sender),
    )
    .unwrap();
    assert!(res.success);
    assert_eq!(balance_of(&conn, x), Decimal::from(10));
}

#[test]
fn wire_transfer_over_the_ceiling_is_rejected() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let x = seed_account(&conn, "111111111", "500000");

    let res = ledger::wire_transfer(
        &mut conn,
        &mut ids,
        &wire_request(x, 100_001, "JP", FeesOption::Sender),
    )
    .unwrap();
    assert!(!res.success);
    assert_eq!(res.receiver_name, None);
    assert_eq!(balance_of(&conn, x), Decimal::from(500000));
}

#[test]
fn paypal_transfer_settles_pending() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let x = seed_account(&conn, "111111111", "100");

    let res = ledger::paypal_transfer(
        &mut conn,
        &mut ids,
        &PaypalRequest {
            from_account_id: x,
            pin: "7294".to_string(),
            amount: Decimal::from(60),
            destination_email: "grace@example.com".to_string(),
            description: None,
            send_receipt: false,
        },
    )
    .unwrap();

    assert!(res.success);
    assert_eq!(res.status, TransactionStatus::Pending);
    assert_eq!(balance_of(&conn, x), Decimal::from(40));
}

#[test]
fn paypal_transfer_has_its_own_ceiling() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let x = seed_account(&conn, "111111111", "10000");

    let res = ledger::paypal_transfer(
        &mut conn,
        &mut ids,
        &PaypalRequest {
            from_account_id: x,
            pin: "7294".to_string(),
            amount: ledger::PAYPAL_CEILING + Decimal::ONE,
            destination_email: "grace@example.com".to_string(),
            description: None,
            send_receipt: false,
        },
    )
    .unwrap();
    assert!(!res.success);
    assert_eq!(balance_of(&conn, x), Decimal::from(10000));
}
