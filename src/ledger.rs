// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Money-moving operations: deposit, withdrawal, internal/external transfer,
//! wire transfer, PayPal-style transfer, and the fee ledger-entry helper used
//! by the card component.
//!
//! Every operation runs inside one SQLite transaction: commit on full
//! success, rollback on any error. Business-rule rejections come back as
//! `success: false` results; exhaustion and persistence failures propagate
//! as errors. Receipt notifications are written after commit and never
//! affect the reported outcome.

use log::debug;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;

use crate::error::{EngineError, EngineResult};
use crate::idgen::{self, IdGenerator};
use crate::models::{Account, Transaction, TransactionStatus, TransactionType};
use crate::notify;
use crate::utils::get_home_country;

pub const DEPOSIT_CEILING: Decimal = Decimal::from_parts(50_000, 0, 0, false, 0);
pub const WITHDRAWAL_CEILING: Decimal = Decimal::from_parts(5_000, 0, 0, false, 0);
pub const PAYPAL_CEILING: Decimal = Decimal::from_parts(5_000, 0, 0, false, 0);
pub const WIRE_CEILING: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

pub const WIRE_FEE_EURO_ZONE: Decimal = Decimal::from_parts(15, 0, 0, false, 0);
pub const WIRE_FEE_DOMESTIC: Decimal = Decimal::from_parts(25, 0, 0, false, 0);
pub const WIRE_FEE_INTERNATIONAL: Decimal = Decimal::from_parts(45, 0, 0, false, 0);

const EURO_ZONE: &[&str] = &["DE", "FR", "ES", "IT", "NL", "BE", "AT", "PT", "IE", "FI"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    Domestic,
    International,
}

impl TransferType {
    pub fn parse(s: &str) -> EngineResult<Self> {
        match s {
            "domestic" => Ok(TransferType::Domestic),
            "international" => Ok(TransferType::International),
            other => Err(EngineError::validation(format!(
                "Unknown transfer type '{}'",
                other
            ))),
        }
    }
}

/// Who carries the wire fee. Legacy spellings map onto the three options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeesOption {
    Sender,
    Beneficiary,
    Shared,
}

impl FeesOption {
    pub fn parse(s: &str) -> Self {
        match s {
            "beneficiary" | "our" => FeesOption::Beneficiary,
            "sender" | "ben" => FeesOption::Sender,
            _ => FeesOption::Shared,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionResult {
    pub success: bool,
    pub message: String,
    pub transaction_id: Option<i64>,
    pub reference: Option<String>,
    pub balance: Option<Decimal>,
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_bank: Option<String>,
}

impl TransactionResult {
    pub fn rejected(message: impl Into<String>) -> Self {
        TransactionResult {
            success: false,
            message: message.into(),
            transaction_id: None,
            reference: None,
            balance: None,
            status: TransactionStatus::Failed,
            receiver_name: None,
            receiver_bank: None,
        }
    }

    fn settled(
        message: impl Into<String>,
        id: i64,
        reference: String,
        balance: Decimal,
        status: TransactionStatus,
    ) -> Self {
        TransactionResult {
            success: true,
            message: message.into(),
            transaction_id: Some(id),
            reference: Some(reference),
            balance: Some(balance),
            status,
            receiver_name: None,
            receiver_bank: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAccountRequest {
    pub customer_id: i64,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct DepositRequest {
    pub account_id: i64,
    pub amount: Decimal,
    pub description: String,
    pub source: Option<String>,
    pub send_receipt: bool,
}

#[derive(Debug, Clone)]
pub struct WithdrawRequest {
    pub account_id: i64,
    pub pin: String,
    pub amount: Decimal,
    pub description: String,
    pub send_receipt: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TransferRequest {
    pub from_account_id: i64,
    pub pin: String,
    pub amount: Decimal,
    pub country: String,
    pub account_number: String,
    pub recipient_name: String,
    pub bank_name: Option<String>,
    pub routing_number: Option<String>,
    pub sort_code: Option<String>,
    pub iban: Option<String>,
    pub swift_code: Option<String>,
    pub bank_address: Option<String>,
    pub description: Option<String>,
    /// Administrative escape hatch: honored as given instead of the
    /// computed settlement status.
    pub forced_status: Option<TransactionStatus>,
    pub transfer_type: Option<TransferType>,
    pub send_receipt: bool,
}

#[derive(Debug, Clone)]
pub struct WireTransferRequest {
    pub from_account_id: i64,
    pub pin: String,
    pub amount: Decimal,
    pub beneficiary_name: String,
    pub beneficiary_account: String,
    pub beneficiary_bank_name: String,
    pub beneficiary_bank_swift: String,
    pub country: String,
    pub iban: Option<String>,
    pub sort_code: Option<String>,
    pub routing_number: Option<String>,
    pub purpose: String,
    pub instructions: Option<String>,
    pub fees_option: FeesOption,
    pub send_receipt: bool,
}

#[derive(Debug, Clone)]
pub struct PaypalRequest {
    pub from_account_id: i64,
    pub pin: String,
    pub amount: Decimal,
    pub destination_email: String,
    pub description: Option<String>,
    pub send_receipt: bool,
}

/// Receipt queued inside a unit of work and delivered only after commit.
struct Notice {
    customer_id: i64,
    title: String,
    content: String,
}

// ---------------------------------------------------------------------------
// row access

pub fn account_by_id(conn: &Connection, id: i64) -> EngineResult<Account> {
    account_row(conn, "SELECT id, customer_id, balance, currency, status, account_number, routing_number, swift_bic, iban, sort_code, pin FROM accounts WHERE id=?1", params![id])?
        .ok_or_else(|| EngineError::not_found(format!("Account {} not found", id)))
}

pub fn account_by_number(conn: &Connection, number: &str) -> EngineResult<Option<Account>> {
    account_row(conn, "SELECT id, customer_id, balance, currency, status, account_number, routing_number, swift_bic, iban, sort_code, pin FROM accounts WHERE account_number=?1", params![number])
}

fn account_row(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> EngineResult<Option<Account>> {
    type Row = (
        i64,
        i64,
        String,
        String,
        String,
        String,
        String,
        String,
        String,
        String,
        String,
    );
    let row: Option<Row> = conn
        .query_row(sql, params, |r| {
            Ok((
                r.get(0)?,
                r.get(1)?,
                r.get(2)?,
                r.get(3)?,
                r.get(4)?,
                r.get(5)?,
                r.get(6)?,
                r.get(7)?,
                r.get(8)?,
                r.get(9)?,
                r.get(10)?,
            ))
        })
        .optional()?;
    let Some(row) = row else { return Ok(None) };
    let balance = row
        .2
        .parse::<Decimal>()
        .map_err(|_| EngineError::validation(format!("Invalid balance '{}' on account {}", row.2, row.0)))?;
    Ok(Some(Account {
        id: row.0,
        customer_id: row.1,
        balance,
        currency: row.3,
        status: row.4,
        account_number: row.5,
        routing_number: row.6,
        swift_bic: row.7,
        iban: row.8,
        sort_code: row.9,
        pin: row.10,
    }))
}

pub(crate) fn set_balance(conn: &Connection, account_id: i64, balance: &Decimal) -> EngineResult<()> {
    conn.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![balance.to_string(), account_id],
    )?;
    Ok(())
}

fn insert_transaction(
    conn: &Connection,
    ids: &mut IdGenerator,
    r#type: TransactionType,
    amount: &Decimal,
    currency: &str,
    from_account_id: i64,
    to_account_id: Option<i64>,
    status: TransactionStatus,
    metadata: Option<serde_json::Value>,
    initiator: &str,
) -> EngineResult<(i64, String)> {
    let reference = ids.transaction_reference()?;
    let metadata = metadata.map(|m| m.to_string());
    conn.execute(
        "INSERT INTO transactions(reference, type, amount, currency, from_account_id, to_account_id, status, metadata, initiator)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            &reference,
            r#type.as_str(),
            amount.to_string(),
            currency,
            from_account_id,
            to_account_id,
            status.as_str(),
            metadata,
            initiator
        ],
    )?;
    Ok((conn.last_insert_rowid(), reference))
}

fn check_pin(account: &Account, pin: &str) -> EngineResult<()> {
    if account.pin != pin {
        return Err(EngineError::validation("Invalid PIN"));
    }
    Ok(())
}

fn check_positive(amount: &Decimal) -> EngineResult<()> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(EngineError::validation("Amount must be a positive number"));
    }
    Ok(())
}

/// Runs a unit of work: commit and deliver the queued notice on success,
/// turn rejections into a failed result, propagate everything else.
fn run_unit(
    conn: &mut Connection,
    unit: impl FnOnce(&rusqlite::Transaction) -> EngineResult<(TransactionResult, Option<Notice>)>,
) -> EngineResult<TransactionResult> {
    let outcome = {
        let tx = conn.transaction()?;
        match unit(&tx) {
            Ok((result, notice)) => {
                tx.commit()?;
                Ok((result, notice))
            }
            Err(e) if e.is_rejection() => {
                debug!("Operation rejected: {}", e);
                Ok((TransactionResult::rejected(e.to_string()), None))
            }
            Err(e) => Err(e),
        }
    }?;
    let (result, notice) = outcome;
    if let Some(n) = notice {
        notify::send_best_effort(conn, n.customer_id, &n.title, &n.content, None);
    }
    Ok(result)
}

// ---------------------------------------------------------------------------
// operations

/// Mints a full identifier bundle and opens a zero-balance account for the
/// customer.
pub fn open_account(
    conn: &mut Connection,
    ids: &mut IdGenerator,
    req: &OpenAccountRequest,
) -> EngineResult<Account> {
    let tx = conn.transaction()?;
    let exists: Option<i64> = tx
        .query_row(
            "SELECT 1 FROM customers WHERE id=?1",
            params![req.customer_id],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(EngineError::not_found(format!(
            "Customer {} not found",
            req.customer_id
        )));
    }

    let account_number = ids.account_number_checked(&tx)?;
    let routing_number = ids.routing_number()?;
    let swift_bic = ids.swift_bic();
    let iban = idgen::iban(&swift_bic, &account_number, &swift_bic[4..6]);
    let sort_code = ids.sort_code()?;
    let pin = ids.pin()?;

    tx.execute(
        "INSERT INTO accounts(customer_id, balance, currency, status, account_number, routing_number, swift_bic, iban, sort_code, pin)
         VALUES (?1, '0', ?2, 'active', ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            req.customer_id,
            &req.currency,
            &account_number,
            &routing_number,
            &swift_bic,
            &iban,
            &sort_code,
            &pin
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok(Account {
        id,
        customer_id: req.customer_id,
        balance: Decimal::ZERO,
        currency: req.currency.clone(),
        status: "active".to_string(),
        account_number,
        routing_number,
        swift_bic,
        iban,
        sort_code,
        pin,
    })
}

pub fn deposit(
    conn: &mut Connection,
    ids: &mut IdGenerator,
    req: &DepositRequest,
) -> EngineResult<TransactionResult> {
    run_unit(conn, |tx| {
        let account = account_by_id(tx, req.account_id)?;
        check_positive(&req.amount)?;
        if req.amount > DEPOSIT_CEILING {
            return Err(EngineError::limit(format!(
                "Deposit exceeds the daily ceiling of {}",
                DEPOSIT_CEILING
            )));
        }

        let new_balance = account.balance + req.amount;
        set_balance(tx, account.id, &new_balance)?;
        let metadata = json!({
            "description": req.description,
            "source": req.source,
        });
        let (id, reference) = insert_transaction(
            tx,
            ids,
            TransactionType::Deposit,
            &req.amount,
            &account.currency,
            account.id,
            None,
            TransactionStatus::Completed,
            Some(metadata),
            &account.customer_id.to_string(),
        )?;

        let notice = req.send_receipt.then(|| Notice {
            customer_id: account.customer_id,
            title: "Deposit received".to_string(),
            content: format!(
                "{} {} was deposited to account {}",
                account.currency, req.amount, account.account_number
            ),
        });
        Ok((
            TransactionResult::settled(
                "Deposit completed",
                id,
                reference,
                new_balance,
                TransactionStatus::Completed,
            ),
            notice,
        ))
    })
}

pub fn withdraw(
    conn: &mut Connection,
    ids: &mut IdGenerator,
    req: &WithdrawRequest,
) -> EngineResult<TransactionResult> {
    run_unit(conn, |tx| {
        let account = account_by_id(tx, req.account_id)?;
        check_pin(&account, &req.pin)?;
        check_positive(&req.amount)?;
        if req.amount > WITHDRAWAL_CEILING {
            return Err(EngineError::limit(format!(
                "Withdrawal exceeds the daily ceiling of {}",
                WITHDRAWAL_CEILING
            )));
        }
        if req.amount > account.balance {
            return Err(EngineError::validation("Insufficient funds"));
        }

        let new_balance = account.balance - req.amount;
        set_balance(tx, account.id, &new_balance)?;
        let metadata = json!({ "description": req.description });
        let (id, reference) = insert_transaction(
            tx,
            ids,
            TransactionType::Withdrawal,
            &req.amount,
            &account.currency,
            account.id,
            None,
            TransactionStatus::Completed,
            Some(metadata),
            &account.customer_id.to_string(),
        )?;

        let notice = req.send_receipt.then(|| Notice {
            customer_id: account.customer_id,
            title: "Withdrawal completed".to_string(),
            content: format!(
                "{} {} was withdrawn from account {}",
                account.currency, req.amount, account.account_number
            ),
        });
        Ok((
            TransactionResult::settled(
                "Withdrawal completed",
                id,
                reference,
                new_balance,
                TransactionStatus::Completed,
            ),
            notice,
        ))
    })
}

/// Transfer classification:
/// - domestic with a resolvable destination account settles COMPLETED and
///   moves both balances in the same unit of work;
/// - international, or domestic with no resolvable destination, debits the
///   sender only and settles PENDING with the recipient bank details kept
///   in metadata.
pub fn transfer(
    conn: &mut Connection,
    ids: &mut IdGenerator,
    req: &TransferRequest,
) -> EngineResult<TransactionResult> {
    run_unit(conn, |tx| {
        let sender = account_by_id(tx, req.from_account_id)?;
        check_pin(&sender, &req.pin)?;
        check_positive(&req.amount)?;
        if req.amount > sender.balance {
            return Err(EngineError::validation("Insufficient funds"));
        }

        let transfer_type = req.transfer_type.unwrap_or(TransferType::Domestic);
        let destination = match transfer_type {
            TransferType::Domestic => account_by_number(tx, &req.account_number)?,
            TransferType::International => None,
        };

        let sender_balance = sender.balance - req.amount;
        let metadata = json!({
            "recipient_name": req.recipient_name,
            "account_number": req.account_number,
            "bank_name": req.bank_name,
            "routing_number": req.routing_number,
            "sort_code": req.sort_code,
            "iban": req.iban,
            "swift_code": req.swift_code,
            "bank_address": req.bank_address,
            "country": req.country,
            "description": req.description,
            "transfer_type": transfer_type,
        });

        let (computed_status, to_account_id) = match &destination {
            Some(dest) => {
                if dest.id == sender.id {
                    return Err(EngineError::validation(
                        "Cannot transfer to the same account",
                    ));
                }
                set_balance(tx, dest.id, &(dest.balance + req.amount))?;
                (TransactionStatus::Completed, Some(dest.id))
            }
            None => (TransactionStatus::Pending, None),
        };
        set_balance(tx, sender.id, &sender_balance)?;

        let status = req.forced_status.unwrap_or(computed_status);
        let (id, reference) = insert_transaction(
            tx,
            ids,
            TransactionType::Transfer,
            &req.amount,
            &sender.currency,
            sender.id,
            to_account_id,
            status,
            Some(metadata),
            &sender.customer_id.to_string(),
        )?;

        let message = match to_account_id {
            Some(_) => format!("Transfer to {} completed", req.recipient_name),
            None => format!("Transfer to {} initiated", req.recipient_name),
        };
        let notice = req.send_receipt.then(|| Notice {
            customer_id: sender.customer_id,
            title: "Transfer receipt".to_string(),
            content: format!(
                "{} {} sent to {} (ref {})",
                sender.currency, req.amount, req.recipient_name, reference
            ),
        });
        Ok((
            TransactionResult::settled(message, id, reference, sender_balance, status),
            notice,
        ))
    })
}

/// Fee tier for a wire destination. The Euro-zone list is cheapest, the
/// configured home country mid, everything else full price.
pub fn wire_fee(conn: &Connection, country: &str) -> EngineResult<Decimal> {
    let country = country.trim().to_uppercase();
    if EURO_ZONE.contains(&country.as_str()) {
        return Ok(WIRE_FEE_EURO_ZONE);
    }
    if country == get_home_country(conn)?.to_uppercase() {
        return Ok(WIRE_FEE_DOMESTIC);
    }
    Ok(WIRE_FEE_INTERNATIONAL)
}

/// Total deducted from the sender for a wire of `amount` with `fee`.
pub fn wire_deduction(amount: Decimal, fee: Decimal, option: FeesOption) -> Decimal {
    match option {
        FeesOption::Beneficiary => amount + fee,
        FeesOption::Sender => amount,
        FeesOption::Shared => amount + fee / Decimal::TWO,
    }
}

/// Wires always settle PENDING; the regulatory hold is released out-of-band.
pub fn wire_transfer(
    conn: &mut Connection,
    ids: &mut IdGenerator,
    req: &WireTransferRequest,
) -> EngineResult<TransactionResult> {
    let mut result = run_unit(conn, |tx| {
        let sender = account_by_id(tx, req.from_account_id)?;
        check_pin(&sender, &req.pin)?;
        check_positive(&req.amount)?;
        if req.amount > WIRE_CEILING {
            return Err(EngineError::limit(format!(
                "Wire transfer exceeds the daily ceiling of {}",
                WIRE_CEILING
            )));
        }

        let fee = wire_fee(tx, &req.country)?;
        let deduction = wire_deduction(req.amount, fee, req.fees_option);
        if deduction > sender.balance {
            return Err(EngineError::validation(
                "Insufficient funds to cover the amount and wire fees",
            ));
        }

        let sender_balance = sender.balance - deduction;
        set_balance(tx, sender.id, &sender_balance)?;

        let metadata = json!({
            "beneficiary_name": req.beneficiary_name,
            "beneficiary_account": req.beneficiary_account,
            "beneficiary_bank_name": req.beneficiary_bank_name,
            "beneficiary_bank_swift": req.beneficiary_bank_swift,
            "country": req.country,
            "iban": req.iban,
            "sort_code": req.sort_code,
            "routing_number": req.routing_number,
            "purpose": req.purpose,
            "instructions": req.instructions,
            "fee": fee,
            "fees_option": req.fees_option,
        });
        let (id, reference) = insert_transaction(
            tx,
            ids,
            TransactionType::WireTransfer,
            &req.amount,
            &sender.currency,
            sender.id,
            None,
            TransactionStatus::Pending,
            Some(metadata),
            &sender.customer_id.to_string(),
        )?;

        let notice = req.send_receipt.then(|| Notice {
            customer_id: sender.customer_id,
            title: "Wire transfer initiated".to_string(),
            content: format!(
                "{} {} wired to {} at {} (ref {})",
                sender.currency,
                req.amount,
                req.beneficiary_name,
                req.beneficiary_bank_name,
                reference
            ),
        });
        Ok((
            TransactionResult::settled(
                format!("Wire transfer to {} initiated", req.beneficiary_name),
                id,
                reference,
                sender_balance,
                TransactionStatus::Pending,
            ),
            notice,
        ))
    })?;

    if result.success {
        result.receiver_name = Some(req.beneficiary_name.clone());
        result.receiver_bank = Some(req.beneficiary_bank_name.clone());
    }
    Ok(result)
}

pub fn paypal_transfer(
    conn: &mut Connection,
    ids: &mut IdGenerator,
    req: &PaypalRequest,
) -> EngineResult<TransactionResult> {
    run_unit(conn, |tx| {
        let sender = account_by_id(tx, req.from_account_id)?;
        check_pin(&sender, &req.pin)?;
        check_positive(&req.amount)?;
        if req.amount > PAYPAL_CEILING {
            return Err(EngineError::limit(format!(
                "PayPal transfer exceeds the daily ceiling of {}",
                PAYPAL_CEILING
            )));
        }
        if req.amount > sender.balance {
            return Err(EngineError::validation("Insufficient funds"));
        }

        let sender_balance = sender.balance - req.amount;
        set_balance(tx, sender.id, &sender_balance)?;
        let metadata = json!({
            "destination_email": req.destination_email,
            "description": req.description,
        });
        let (id, reference) = insert_transaction(
            tx,
            ids,
            TransactionType::Paypal,
            &req.amount,
            &sender.currency,
            sender.id,
            None,
            TransactionStatus::Pending,
            Some(metadata),
            &sender.customer_id.to_string(),
        )?;

        let notice = req.send_receipt.then(|| Notice {
            customer_id: sender.customer_id,
            title: "PayPal transfer initiated".to_string(),
            content: format!(
                "{} {} sent to {} (ref {})",
                sender.currency, req.amount, req.destination_email, reference
            ),
        });
        Ok((
            TransactionResult::settled(
                format!("Transfer to {} initiated", req.destination_email),
                id,
                reference,
                sender_balance,
                TransactionStatus::Pending,
            ),
            notice,
        ))
    })
}

/// Records a COMPLETED fee-type ledger row inside an already-open unit of
/// work. The caller owns the matching balance adjustment.
pub fn card_fee_transaction(
    conn: &Connection,
    ids: &mut IdGenerator,
    account: &Account,
    amount: &Decimal,
    description: &str,
    initiator: &str,
) -> EngineResult<(i64, String)> {
    check_positive(amount)?;
    let metadata = json!({ "description": description });
    insert_transaction(
        conn,
        ids,
        TransactionType::Fee,
        amount,
        &account.currency,
        account.id,
        None,
        TransactionStatus::Completed,
        Some(metadata),
        initiator,
    )
}

/// Most-recent-first transaction listing for the dashboard statement view.
pub fn statement(
    conn: &Connection,
    account_id: i64,
    limit: Option<usize>,
) -> EngineResult<Vec<Transaction>> {
    let mut sql = String::from(
        "SELECT id, reference, type, amount, currency, from_account_id, to_account_id, status, metadata, initiator
         FROM transactions WHERE from_account_id=?1 OR to_account_id=?1 ORDER BY id DESC",
    );
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![account_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let amount_s: String = r.get(3)?;
        let type_s: String = r.get(2)?;
        let status_s: String = r.get(7)?;
        out.push(Transaction {
            id: r.get(0)?,
            reference: r.get(1)?,
            r#type: TransactionType::parse(&type_s)?,
            amount: amount_s.parse::<Decimal>().map_err(|_| {
                EngineError::validation(format!("Invalid amount '{}' in transactions", amount_s))
            })?,
            currency: r.get(4)?,
            from_account_id: r.get(5)?,
            to_account_id: r.get(6)?,
            status: TransactionStatus::parse(&status_s)?,
            metadata: r.get(8)?,
            initiator: r.get(9)?,
        });
    }
    Ok(out)
}
