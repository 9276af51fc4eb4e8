// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Card lifecycle and the per-card spend ledger.
//!
//! Card transactions live in their own table keyed by card id; the
//! spent_daily/spent_monthly counters on the card row are maintained
//! incrementally. Completed debit-classified entries (purchase, ATM
//! withdrawal, online payment) are the only ones that consume limit headroom
//! and account balance, and every edit or delete first reverses the old
//! entry's effect before applying the new one, all inside one unit of work.

use chrono::{Months, NaiveDate, Utc};
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::idgen::IdGenerator;
use crate::ledger;
use crate::models::{Card, CardStatus, CardTransaction, CardTxType, CardType, TransactionStatus};
use crate::notify;

pub const DEBIT_ISSUANCE_FEE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
pub const CREDIT_ISSUANCE_FEE: Decimal = Decimal::from_parts(25, 0, 0, false, 0);
pub const EXPEDITED_SURCHARGE: Decimal = Decimal::from_parts(15, 0, 0, false, 0);
pub const DAILY_LIMIT_CAP: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);
pub const DEFAULT_MONTHLY_LIMIT: Decimal = Decimal::from_parts(5_000, 0, 0, false, 0);
const CARD_VALIDITY_MONTHS: u32 = 48;

#[derive(Debug, Clone)]
pub struct CardRequestOptions {
    pub account_id: i64,
    pub card_type: CardType,
    pub requested_limit: Option<Decimal>,
    pub expedited: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardRequestResult {
    pub success: bool,
    pub message: String,
    pub card: Option<Card>,
    pub fees_charged: Option<Decimal>,
    pub new_balance: Option<Decimal>,
    pub full_card_number: Option<String>,
    pub pin: Option<String>,
}

impl CardRequestResult {
    fn rejected(message: String) -> Self {
        CardRequestResult {
            success: false,
            message,
            card: None,
            fees_charged: None,
            new_balance: None,
            full_card_number: None,
            pin: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CardTransactionOptions {
    pub amount: Decimal,
    pub r#type: CardTxType,
    pub merchant: Option<String>,
    pub location: Option<String>,
    pub currency: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<TransactionStatus>,
}

/// Field changes for an edit; unspecified fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct CardTransactionUpdate {
    pub amount: Option<Decimal>,
    pub r#type: Option<CardTxType>,
    pub merchant: Option<String>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<TransactionStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardOpResult {
    pub success: bool,
    pub message: String,
    pub transaction: Option<CardTransaction>,
    pub balance: Option<Decimal>,
}

impl CardOpResult {
    fn rejected(message: String) -> Self {
        CardOpResult {
            success: false,
            message,
            transaction: None,
            balance: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CardActionResult {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardStatistics {
    pub total_transactions: i64,
    pub total_spent: Decimal,
    pub total_received: Decimal,
    pub month_transactions: i64,
    pub month_spent: Decimal,
    pub remaining_daily: Decimal,
    pub remaining_monthly: Decimal,
}

struct Notice {
    customer_id: i64,
    title: String,
    content: String,
    action_link: Option<String>,
}

/// Same unit-of-work contract as the ledger operations: commit plus
/// post-commit notice on success, a failed result on rejection, an error on
/// everything else.
fn run_unit<T>(
    conn: &mut Connection,
    on_reject: impl FnOnce(String) -> T,
    unit: impl FnOnce(&rusqlite::Transaction) -> EngineResult<(T, Option<Notice>)>,
) -> EngineResult<T> {
    let (result, notice) = {
        let tx = conn.transaction()?;
        match unit(&tx) {
            Ok((result, notice)) => {
                tx.commit()?;
                (result, notice)
            }
            Err(e) if e.is_rejection() => {
                debug!("Card operation rejected: {}", e);
                (on_reject(e.to_string()), None)
            }
            Err(e) => return Err(e),
        }
    };
    if let Some(n) = notice {
        notify::send_best_effort(
            conn,
            n.customer_id,
            &n.title,
            &n.content,
            n.action_link.as_deref(),
        );
    }
    Ok(result)
}

// ---------------------------------------------------------------------------
// row access

pub fn card_by_id(conn: &Connection, id: i64) -> EngineResult<Card> {
    let row = conn
        .query_row(
            "SELECT id, account_id, card_number, cvv, card_type, status, daily_limit, monthly_limit,
                    spent_daily, spent_monthly, pin, expiry
             FROM cards WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, i64>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                    r.get::<_, String>(5)?,
                    r.get::<_, String>(6)?,
                    r.get::<_, String>(7)?,
                    r.get::<_, String>(8)?,
                    r.get::<_, String>(9)?,
                    r.get::<_, String>(10)?,
                    r.get::<_, String>(11)?,
                ))
            },
        )
        .optional()?
        .ok_or_else(|| EngineError::not_found(format!("Card {} not found", id)))?;
    Ok(Card {
        id: row.0,
        account_id: row.1,
        card_number: row.2,
        cvv: row.3,
        card_type: CardType::parse(&row.4)?,
        status: CardStatus::parse(&row.5)?,
        daily_limit: parse_amount(&row.6, "daily_limit")?,
        monthly_limit: parse_amount(&row.7, "monthly_limit")?,
        spent_daily: parse_amount(&row.8, "spent_daily")?,
        spent_monthly: parse_amount(&row.9, "spent_monthly")?,
        pin: row.10,
        expiry: NaiveDate::parse_from_str(&row.11, "%Y-%m-%d")
            .map_err(|_| EngineError::validation(format!("Invalid expiry '{}' on card {}", row.11, row.0)))?,
    })
}

pub fn card_transaction_by_id(
    conn: &Connection,
    card_id: i64,
    tx_id: i64,
) -> EngineResult<CardTransaction> {
    let row = conn
        .query_row(
            "SELECT id, card_id, reference, amount, type, merchant, location, date, status, currency
             FROM card_transactions WHERE card_id=?1 AND id=?2",
            params![card_id, tx_id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, i64>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                    r.get::<_, String>(5)?,
                    r.get::<_, String>(6)?,
                    r.get::<_, String>(7)?,
                    r.get::<_, String>(8)?,
                    r.get::<_, String>(9)?,
                ))
            },
        )
        .optional()?
        .ok_or_else(|| {
            EngineError::not_found(format!("Transaction {} not found on card {}", tx_id, card_id))
        })?;
    Ok(CardTransaction {
        id: row.0,
        card_id: row.1,
        reference: row.2,
        amount: parse_amount(&row.3, "amount")?,
        r#type: CardTxType::parse(&row.4)?,
        merchant: row.5,
        location: row.6,
        date: NaiveDate::parse_from_str(&row.7, "%Y-%m-%d")
            .map_err(|_| EngineError::validation(format!("Invalid date '{}' on card transaction {}", row.7, row.0)))?,
        status: TransactionStatus::parse(&row.8)?,
        currency: row.9,
    })
}

pub fn list_card_transactions(conn: &Connection, card_id: i64) -> EngineResult<Vec<CardTransaction>> {
    let mut stmt = conn.prepare(
        "SELECT id FROM card_transactions WHERE card_id=?1 ORDER BY date DESC, id DESC",
    )?;
    let ids: Vec<i64> = stmt
        .query_map(params![card_id], |r| r.get(0))?
        .collect::<rusqlite::Result<_>>()?;
    ids.into_iter()
        .map(|id| card_transaction_by_id(conn, card_id, id))
        .collect()
}

fn parse_amount(s: &str, field: &str) -> EngineResult<Decimal> {
    s.parse::<Decimal>()
        .map_err(|_| EngineError::validation(format!("Invalid {} '{}'", field, s)))
}

fn set_counters(conn: &Connection, card_id: i64, daily: &Decimal, monthly: &Decimal) -> EngineResult<()> {
    conn.execute(
        "UPDATE cards SET spent_daily=?1, spent_monthly=?2 WHERE id=?3",
        params![daily.to_string(), monthly.to_string(), card_id],
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// lifecycle

/// Issues a card against an account, charging the issuance fee in the same
/// unit of work.
pub fn request_card(
    conn: &mut Connection,
    ids: &mut IdGenerator,
    opts: &CardRequestOptions,
) -> EngineResult<CardRequestResult> {
    run_unit(conn, CardRequestResult::rejected, |tx| {
        let account = ledger::account_by_id(tx, opts.account_id)?;

        // one non-expired card per type per owner, across all of their accounts
        let existing: Option<i64> = tx
            .query_row(
                "SELECT c.id FROM cards c JOIN accounts a ON c.account_id=a.id
                 WHERE a.customer_id=?1 AND c.card_type=?2 AND c.status != 'expired'",
                params![account.customer_id, opts.card_type.as_str()],
                |r| r.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(EngineError::validation(format!(
                "Customer already has a {} card",
                opts.card_type.as_str()
            )));
        }

        let mut fee = match opts.card_type {
            CardType::Debit => DEBIT_ISSUANCE_FEE,
            CardType::Credit => CREDIT_ISSUANCE_FEE,
        };
        if opts.expedited {
            fee += EXPEDITED_SURCHARGE;
        }
        if fee > account.balance {
            return Err(EngineError::validation(
                "Insufficient funds for the card issuance fee",
            ));
        }

        let monthly_limit = opts.requested_limit.unwrap_or(DEFAULT_MONTHLY_LIMIT);
        if monthly_limit <= Decimal::ZERO {
            return Err(EngineError::validation("Requested limit must be positive"));
        }
        let daily_limit = (monthly_limit / Decimal::TEN).min(DAILY_LIMIT_CAP);

        let brand = match opts.card_type {
            CardType::Debit => "visa",
            CardType::Credit => "mastercard",
        };
        let card_number = ids.card_number_checked(tx, brand)?;
        let cvv = ids.cvv(brand);
        let pin = ids.pin()?;
        let today = Utc::now().date_naive();
        let expiry = today + Months::new(CARD_VALIDITY_MONTHS);

        let new_balance = account.balance - fee;
        ledger::set_balance(tx, account.id, &new_balance)?;

        tx.execute(
            "INSERT INTO cards(account_id, card_number, cvv, card_type, status, daily_limit, monthly_limit, pin, expiry)
             VALUES (?1, ?2, ?3, ?4, 'active', ?5, ?6, ?7, ?8)",
            params![
                account.id,
                &card_number,
                &cvv,
                opts.card_type.as_str(),
                daily_limit.to_string(),
                monthly_limit.to_string(),
                &pin,
                expiry.to_string()
            ],
        )?;
        let card_id = tx.last_insert_rowid();

        // the fee shows up in the card's own ledger and in the main ledger
        let fee_reference = ids.transaction_reference()?;
        tx.execute(
            "INSERT INTO card_transactions(card_id, reference, amount, type, merchant, location, date, status, currency)
             VALUES (?1, ?2, ?3, 'fee', 'Card issuance', '', ?4, 'completed', ?5)",
            params![
                card_id,
                &fee_reference,
                fee.to_string(),
                today.to_string(),
                &account.currency
            ],
        )?;
        ledger::card_fee_transaction(
            tx,
            ids,
            &account,
            &fee,
            "Card issuance fee",
            &account.customer_id.to_string(),
        )?;

        let card = card_by_id(tx, card_id)?;
        let notice = Notice {
            customer_id: account.customer_id,
            title: "Your new card is ready".to_string(),
            content: format!(
                "A {} card ending in {} was issued against account {}",
                opts.card_type.as_str(),
                &card_number[card_number.len() - 4..],
                account.account_number
            ),
            action_link: Some("/cards".to_string()),
        };
        Ok((
            CardRequestResult {
                success: true,
                message: "Card issued".to_string(),
                card: Some(card),
                fees_charged: Some(fee),
                new_balance: Some(new_balance),
                full_card_number: Some(card_number),
                pin: Some(pin),
            },
            Some(notice),
        ))
    })
}

/// Flips an active card whose expiry has passed to expired. The flip is its
/// own committed write so it survives the rejection of the operation that
/// noticed it.
fn expire_if_due(conn: &Connection, card_id: i64) -> EngineResult<bool> {
    let card = match card_by_id(conn, card_id) {
        Ok(card) => card,
        Err(e) if e.is_rejection() => return Ok(false),
        Err(e) => return Err(e),
    };
    if card.status == CardStatus::Active && card.expiry < Utc::now().date_naive() {
        conn.execute(
            "UPDATE cards SET status='expired' WHERE id=?1",
            params![card_id],
        )?;
        return Ok(true);
    }
    Ok(false)
}

pub fn add_transaction(
    conn: &mut Connection,
    ids: &mut IdGenerator,
    card_id: i64,
    opts: &CardTransactionOptions,
) -> EngineResult<CardOpResult> {
    if expire_if_due(conn, card_id)? {
        return Ok(CardOpResult::rejected("Card has expired".to_string()));
    }
    run_unit(conn, CardOpResult::rejected, |tx| {
        let card = card_by_id(tx, card_id)?;
        let account = ledger::account_by_id(tx, card.account_id)?;
        if card.status != CardStatus::Active {
            return Err(EngineError::validation("Card is not active"));
        }

        let today = Utc::now().date_naive();
        let date = opts.date.unwrap_or(today);
        if date > today {
            return Err(EngineError::validation(
                "Transaction date cannot be in the future",
            ));
        }
        if opts.amount.is_sign_negative() || opts.amount.is_zero() {
            return Err(EngineError::validation("Amount must be a positive number"));
        }

        let status = opts.status.unwrap_or(TransactionStatus::Completed);
        let counts = opts.r#type.is_debit() && status == TransactionStatus::Completed;
        let mut balance = account.balance;
        if counts {
            if card.spent_daily + opts.amount > card.daily_limit {
                return Err(EngineError::limit("Daily limit exceeded"));
            }
            if card.spent_monthly + opts.amount > card.monthly_limit {
                return Err(EngineError::limit("Monthly limit exceeded"));
            }
            if opts.amount > account.balance {
                return Err(EngineError::validation("Insufficient funds"));
            }
            balance -= opts.amount;
            ledger::set_balance(tx, account.id, &balance)?;
            set_counters(
                tx,
                card.id,
                &(card.spent_daily + opts.amount),
                &(card.spent_monthly + opts.amount),
            )?;
        }

        let reference = ids.transaction_reference()?;
        tx.execute(
            "INSERT INTO card_transactions(card_id, reference, amount, type, merchant, location, date, status, currency)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                card.id,
                &reference,
                opts.amount.to_string(),
                opts.r#type.as_str(),
                opts.merchant.as_deref().unwrap_or(""),
                opts.location.as_deref().unwrap_or(""),
                date.to_string(),
                status.as_str(),
                opts.currency.as_deref().unwrap_or(&account.currency)
            ],
        )?;
        let entry = card_transaction_by_id(tx, card.id, tx.last_insert_rowid())?;

        Ok((
            CardOpResult {
                success: true,
                message: "Transaction recorded".to_string(),
                transaction: Some(entry),
                balance: Some(balance),
            },
            None,
        ))
    })
}

/// Reverse-then-reapply: the old entry's balance and counter effects are
/// undone before the merged entry is validated and applied; a failed
/// validation aborts the whole unit, so the original state survives.
pub fn edit_transaction(
    conn: &mut Connection,
    card_id: i64,
    tx_id: i64,
    updates: &CardTransactionUpdate,
) -> EngineResult<CardOpResult> {
    run_unit(conn, CardOpResult::rejected, |tx| {
        let card = card_by_id(tx, card_id)?;
        let account = ledger::account_by_id(tx, card.account_id)?;
        let existing = card_transaction_by_id(tx, card_id, tx_id)?;

        let mut spent_daily = card.spent_daily;
        let mut spent_monthly = card.spent_monthly;
        let mut balance = account.balance;

        if existing.r#type.is_debit() && existing.status == TransactionStatus::Completed {
            spent_daily -= existing.amount;
            spent_monthly -= existing.amount;
            balance += existing.amount;
        }

        let merged = CardTransaction {
            id: existing.id,
            card_id: existing.card_id,
            reference: existing.reference,
            amount: updates.amount.unwrap_or(existing.amount),
            r#type: updates.r#type.unwrap_or(existing.r#type),
            merchant: updates.merchant.clone().unwrap_or(existing.merchant),
            location: updates.location.clone().unwrap_or(existing.location),
            date: updates.date.unwrap_or(existing.date),
            status: updates.status.unwrap_or(existing.status),
            currency: existing.currency,
        };
        if merged.amount.is_sign_negative() || merged.amount.is_zero() {
            return Err(EngineError::validation("Amount must be a positive number"));
        }

        if merged.r#type.is_debit() && merged.status == TransactionStatus::Completed {
            if spent_daily + merged.amount > card.daily_limit {
                return Err(EngineError::limit("Daily limit exceeded"));
            }
            if spent_monthly + merged.amount > card.monthly_limit {
                return Err(EngineError::limit("Monthly limit exceeded"));
            }
            if merged.amount > balance {
                return Err(EngineError::validation("Insufficient funds"));
            }
            spent_daily += merged.amount;
            spent_monthly += merged.amount;
            balance -= merged.amount;
        }

        tx.execute(
            "UPDATE card_transactions SET amount=?1, type=?2, merchant=?3, location=?4, date=?5, status=?6
             WHERE id=?7",
            params![
                merged.amount.to_string(),
                merged.r#type.as_str(),
                &merged.merchant,
                &merged.location,
                merged.date.to_string(),
                merged.status.as_str(),
                merged.id
            ],
        )?;
        set_counters(tx, card.id, &spent_daily, &spent_monthly)?;
        ledger::set_balance(tx, account.id, &balance)?;

        Ok((
            CardOpResult {
                success: true,
                message: "Transaction updated".to_string(),
                transaction: Some(merged),
                balance: Some(balance),
            },
            None,
        ))
    })
}

pub fn delete_transaction(
    conn: &mut Connection,
    card_id: i64,
    tx_id: i64,
) -> EngineResult<CardOpResult> {
    run_unit(conn, CardOpResult::rejected, |tx| {
        let card = card_by_id(tx, card_id)?;
        let account = ledger::account_by_id(tx, card.account_id)?;
        let existing = card_transaction_by_id(tx, card_id, tx_id)?;

        let mut balance = account.balance;
        if existing.r#type.is_debit() && existing.status == TransactionStatus::Completed {
            balance += existing.amount;
            ledger::set_balance(tx, account.id, &balance)?;
            set_counters(
                tx,
                card.id,
                &(card.spent_daily - existing.amount),
                &(card.spent_monthly - existing.amount),
            )?;
        }
        tx.execute(
            "DELETE FROM card_transactions WHERE id=?1",
            params![existing.id],
        )?;

        Ok((
            CardOpResult {
                success: true,
                message: "Transaction deleted".to_string(),
                transaction: Some(existing),
                balance: Some(balance),
            },
            None,
        ))
    })
}

/// active -> blocked, blocked -> active. Anything else is terminal.
pub fn toggle_status(conn: &mut Connection, card_id: i64) -> EngineResult<CardActionResult> {
    run_unit(
        conn,
        |message| CardActionResult { success: false, message },
        |tx| {
            let card = card_by_id(tx, card_id)?;
            let next = match card.status {
                CardStatus::Active => CardStatus::Blocked,
                CardStatus::Blocked => CardStatus::Active,
                CardStatus::Expired => {
                    return Err(EngineError::validation(
                        "An expired card cannot be blocked or unblocked",
                    ));
                }
            };
            tx.execute(
                "UPDATE cards SET status=?1 WHERE id=?2",
                params![next.as_str(), card.id],
            )?;
            Ok((
                CardActionResult {
                    success: true,
                    message: format!("Card is now {}", next.as_str()),
                },
                None,
            ))
        },
    )
}

pub fn change_pin(conn: &mut Connection, card_id: i64, new_pin: &str) -> EngineResult<CardActionResult> {
    run_unit(
        conn,
        |message| CardActionResult { success: false, message },
        |tx| {
            let card = card_by_id(tx, card_id)?;
            if new_pin.len() != 4 || !new_pin.chars().all(|c| c.is_ascii_digit()) {
                return Err(EngineError::validation("PIN must be exactly 4 digits"));
            }
            tx.execute(
                "UPDATE cards SET pin=?1 WHERE id=?2",
                params![new_pin, card.id],
            )?;
            Ok((
                CardActionResult {
                    success: true,
                    message: "PIN updated".to_string(),
                },
                None,
            ))
        },
    )
}

/// Hard-deletes the card and its embedded ledger, then tells the owner to
/// request a replacement.
pub fn report_card(
    conn: &mut Connection,
    card_id: i64,
    reason: &str,
) -> EngineResult<CardActionResult> {
    run_unit(
        conn,
        |message| CardActionResult { success: false, message },
        |tx| {
            let card = card_by_id(tx, card_id)?;
            let account = ledger::account_by_id(tx, card.account_id)?;
            tx.execute("DELETE FROM card_transactions WHERE card_id=?1", params![card.id])?;
            tx.execute("DELETE FROM cards WHERE id=?1", params![card.id])?;
            let notice = Notice {
                customer_id: account.customer_id,
                title: "Card reported".to_string(),
                content: format!(
                    "Your {} card ending in {} was reported {} and has been removed. Please request a replacement card.",
                    card.card_type.as_str(),
                    &card.card_number[card.card_number.len() - 4..],
                    reason
                ),
                action_link: Some("/cards/request".to_string()),
            };
            Ok((
                CardActionResult {
                    success: true,
                    message: "Card removed; a replacement can be requested".to_string(),
                },
                Some(notice),
            ))
        },
    )
}

/// Read-only aggregate over the card's ledger. No mutation.
pub fn statistics(conn: &Connection, card_id: i64) -> EngineResult<CardStatistics> {
    let card = card_by_id(conn, card_id)?;
    let entries = list_card_transactions(conn, card_id)?;
    let month = Utc::now().format("%Y-%m").to_string();

    let mut total_spent = Decimal::ZERO;
    let mut total_received = Decimal::ZERO;
    let mut month_transactions = 0i64;
    let mut month_spent = Decimal::ZERO;
    for e in &entries {
        let completed = e.status == TransactionStatus::Completed;
        if completed && e.r#type.is_debit() {
            total_spent += e.amount;
        }
        if completed && e.r#type == CardTxType::Refund {
            total_received += e.amount;
        }
        if e.date.format("%Y-%m").to_string() == month {
            month_transactions += 1;
            if completed && e.r#type.is_debit() {
                month_spent += e.amount;
            }
        }
    }

    Ok(CardStatistics {
        total_transactions: entries.len() as i64,
        total_spent,
        total_received,
        month_transactions,
        month_spent,
        remaining_daily: card.daily_limit - card.spent_daily,
        remaining_monthly: card.monthly_limit - card.spent_monthly,
    })
}
