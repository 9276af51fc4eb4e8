// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use vaultledger::db;
use vaultledger::error::EngineError;
use vaultledger::idgen::{self, IdGenerator, iban_valid};
use vaultledger::ledger::{
    self, DepositRequest, OpenAccountRequest, WithdrawRequest,
};
use vaultledger::models::{TransactionStatus, TransactionType};

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

fn seed_account(conn: &Connection, number: &str, balance: &str, pin: &str) -> i64 {
    conn.execute(
        "INSERT INTO accounts(customer_id, balance, currency, status, account_number, routing_number, swift_bic, iban, sort_code, pin)
         VALUES (1, ?1, 'USD', 'active', ?2, '011000056', 'CHASUS33', 'US33CHAS0000123456', '20-11-45', ?3)",
        params![balance, number, pin],
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

fn transaction_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn open_account_mints_a_consistent_identifier_bundle() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let account = ledger::open_account(
        &mut conn,
        &mut ids,
        &OpenAccountRequest {
            customer_id: 1,
            currency: "USD".to_string(),
        },
    )
    .unwrap();

    assert_eq!(account.balance, Decimal::ZERO);
    assert_eq!(account.status, "active");
    assert_eq!(account.routing_number.len(), 9);
    let check = account.routing_number.chars().last().unwrap().to_digit(10).unwrap();
    assert_eq!(check, idgen::aba_check_digit(&account.routing_number[0..8]));
    assert!(iban_valid(&account.iban));
    assert_eq!(account.sort_code.len(), 8);
    assert_eq!(account.pin.len(), 4);
    assert!(!idgen::is_weak_pin(&account.pin));

    // persisted row matches what was handed back
    let stored: String = conn
        .query_row(
            "SELECT account_number FROM accounts WHERE id=?1",
            params![account.id],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(stored, account.account_number);
}

#[test]
fn open_account_for_unknown_customer_fails() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let err = ledger::open_account(
        &mut conn,
        &mut ids,
        &OpenAccountRequest {
            customer_id: 42,
            currency: "USD".to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[test]
fn deposit_credits_the_balance_and_records_a_ledger_row() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let id = seed_account(&conn, "100200300", "100", "7294");

    let res = ledger::deposit(
        &mut conn,
        &mut ids,
        &DepositRequest {
            account_id: id,
            amount: Decimal::from(250),
            description: "payroll".to_string(),
            source: Some("employer".to_string()),
            send_receipt: false,
        },
    )
    .unwrap();

    assert!(res.success);
    assert_eq!(res.status, TransactionStatus::Completed);
    assert_eq!(res.balance, Some(Decimal::from(350)));
    assert_eq!(balance_of(&conn, id), Decimal::from(350));

    let (type_s, status_s, amount_s): (String, String, String) = conn
        .query_row(
            "SELECT type, status, amount FROM transactions WHERE id=?1",
            params![res.transaction_id.unwrap()],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(type_s, TransactionType::Deposit.as_str());
    assert_eq!(status_s, "completed");
    assert_eq!(amount_s, "250");
}

#[test]
fn deposit_rejects_non_positive_amounts() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let id = seed_account(&conn, "100200300", "100", "7294");

    for amount in [Decimal::ZERO, Decimal::from(-5)] {
        let res = ledger::deposit(
            &mut conn,
            &mut ids,
            &DepositRequest {
                account_id: id,
                amount,
                description: String::new(),
                source: None,
                send_receipt: false,
            },
        )
        .unwrap();
        assert!(!res.success);
        assert_eq!(res.status, TransactionStatus::Failed);
    }
    assert_eq!(balance_of(&conn, id), Decimal::from(100));
    assert_eq!(transaction_count(&conn), 0);
}

#[test]
fn deposit_over_the_ceiling_is_rejected() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let id = seed_account(&conn, "100200300", "100", "7294");

    let res = ledger::deposit(
        &mut conn,
        &mut ids,
        &DepositRequest {
            account_id: id,
            amount: ledger::DEPOSIT_CEILING + Decimal::ONE,
            description: String::new(),
            source: None,
            send_receipt: false,
        },
    )
    .unwrap();
    assert!(!res.success);
    assert_eq!(balance_of(&conn, id), Decimal::from(100));

    // exactly at the ceiling is fine
    let res = ledger::deposit(
        &mut conn,
        &mut ids,
        &DepositRequest {
            account_id: id,
            amount: ledger::DEPOSIT_CEILING,
            description: String::new(),
            source: None,
            send_receipt: false,
        },
    )
    .unwrap();
    assert!(res.success);
}

#[test]
fn withdraw_requires_the_right_pin() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let id = seed_account(&conn, "100200300", "100", "7294");

    let res = ledger::withdraw(
        &mut conn,
        &mut ids,
        &WithdrawRequest {
            account_id: id,
            pin: "0000".to_string(),
            amount: Decimal::from(10),
            description: String::new(),
            send_receipt: false,
        },
    )
    .unwrap();
    assert!(!res.success);
    assert_eq!(res.message, "Invalid PIN");
    assert_eq!(balance_of(&conn, id), Decimal::from(100));
}

#[test]
fn overdraw_fails_and_leaves_the_balance_untouched() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let id = seed_account(&conn, "100200300", "100", "7294");

    let res = ledger::withdraw(
        &mut conn,
        &mut ids,
        &WithdrawRequest {
            account_id: id,
            pin: "7294".to_string(),
            amount: Decimal::from(150),
            description: String::new(),
            send_receipt: false,
        },
    )
    .unwrap();
    assert!(!res.success);
    assert_eq!(balance_of(&conn, id), Decimal::from(100));
    assert_eq!(transaction_count(&conn), 0);

    let res = ledger::withdraw(
        &mut conn,
        &mut ids,
        &WithdrawRequest {
            account_id: id,
            pin: "7294".to_string(),
            amount: Decimal::from(50),
            description: String::new(),
            send_receipt: false,
        },
    )
    .unwrap();
    assert!(res.success);
    assert_eq!(balance_of(&conn, id), Decimal::from(50));
}

#[test]
fn withdrawal_ceiling_applies_even_with_funds_available() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let id = seed_account(&conn, "100200300", "20000", "7294");

    let res = ledger::withdraw(
        &mut conn,
        &mut ids,
        &WithdrawRequest {
            account_id: id,
            pin: "7294".to_string(),
            amount: ledger::WITHDRAWAL_CEILING + Decimal::ONE,
            description: String::new(),
            send_receipt: false,
        },
    )
    .unwrap();
    assert!(!res.success);
    assert_eq!(balance_of(&conn, id), Decimal::from(20000));
}

#[test]
fn missing_account_propagates_as_a_rejection_result() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let res = ledger::deposit(
        &mut conn,
        &mut ids,
        &DepositRequest {
            account_id: 999,
            amount: Decimal::from(10),
            description: String::new(),
            source: None,
            send_receipt: false,
        },
    )
    .unwrap();
    assert!(!res.success);
    assert!(res.message.contains("not found"));
}

#[test]
fn receipt_notification_lands_in_the_inbox() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let id = seed_account(&conn, "100200300", "100", "7294");

    ledger::deposit(
        &mut conn,
        &mut ids,
        &DepositRequest {
            account_id: id,
            amount: Decimal::from(25),
            description: String::new(),
            source: None,
            send_receipt: true,
        },
    )
    .unwrap();

    let (count, title): (i64, String) = conn
        .query_row(
            "SELECT COUNT(*), MAX(title) FROM notifications WHERE customer_id=1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(title, "Deposit received");
}

#[test]
fn notification_failure_does_not_void_the_deposit() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let id = seed_account(&conn, "100200300", "100", "7294");
    conn.execute("DROP TABLE notifications", []).unwrap();

    let res = ledger::deposit(
        &mut conn,
        &mut ids,
        &DepositRequest {
            account_id: id,
            amount: Decimal::from(25),
            description: String::new(),
            source: None,
            send_receipt: true,
        },
    )
    .unwrap();
    assert!(res.success);
    assert_eq!(balance_of(&conn, id), Decimal::from(125));
}

#[test]
fn statement_lists_most_recent_first_and_honors_the_limit() {
    let mut conn = setup();
    let mut ids = IdGenerator::new();
    let id = seed_account(&conn, "100200300", "1000", "7294");

    for amount in [10, 20, 30] {
        ledger::deposit(
            &mut conn,
            &mut ids,
            &DepositRequest {
                account_id: id,
                amount: Decimal::from(amount),
                description: String::new(),
                source: None,
                send_receipt: false,
            },
        )
        .unwrap();
    }

    let all = ledger::statement(&conn, id, None).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].amount, Decimal::from(30));
    assert_eq!(all[2].amount, Decimal::from(10));

    let top = ledger::statement(&conn, id, Some(2)).unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].amount, Decimal::from(30));
}
