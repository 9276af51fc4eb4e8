// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub customer_id: i64,
    pub balance: Decimal,
    pub currency: String,
    pub status: String,
    pub account_number: String,
    pub routing_number: String,
    pub swift_bic: String,
    pub iban: String,
    pub sort_code: String,
    pub pin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub reference: String,
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub currency: String,
    pub from_account_id: i64,
    pub to_account_id: Option<i64>,
    pub status: TransactionStatus,
    pub metadata: Option<String>,
    pub initiator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub account_id: i64,
    pub card_number: String,
    pub cvv: String,
    pub card_type: CardType,
    pub status: CardStatus,
    pub daily_limit: Decimal,
    pub monthly_limit: Decimal,
    pub spent_daily: Decimal,
    pub spent_monthly: Decimal,
    pub pin: String,
    pub expiry: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardTransaction {
    pub id: i64,
    pub card_id: i64,
    pub reference: String,
    pub amount: Decimal,
    pub r#type: CardTxType,
    pub merchant: String,
    pub location: String,
    pub date: NaiveDate,
    pub status: TransactionStatus,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    WireTransfer,
    Paypal,
    Fee,
    BillPayment,
    Interest,
    CardTransaction,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Transfer => "transfer",
            TransactionType::WireTransfer => "wire_transfer",
            TransactionType::Paypal => "paypal",
            TransactionType::Fee => "fee",
            TransactionType::BillPayment => "bill_payment",
            TransactionType::Interest => "interest",
            TransactionType::CardTransaction => "card_transaction",
        }
    }

    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s {
            "deposit" => Ok(TransactionType::Deposit),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            "transfer" => Ok(TransactionType::Transfer),
            "wire_transfer" => Ok(TransactionType::WireTransfer),
            "paypal" => Ok(TransactionType::Paypal),
            "fee" => Ok(TransactionType::Fee),
            "bill_payment" => Ok(TransactionType::BillPayment),
            "interest" => Ok(TransactionType::Interest),
            "card_transaction" => Ok(TransactionType::CardTransaction),
            other => Err(EngineError::validation(format!(
                "Unknown transaction type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Processing,
    Reversed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Processing => "processing",
            TransactionStatus::Reversed => "reversed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            "processing" => Ok(TransactionStatus::Processing),
            "reversed" => Ok(TransactionStatus::Reversed),
            other => Err(EngineError::validation(format!(
                "Unknown transaction status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Debit,
    Credit,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Debit => "debit",
            CardType::Credit => "credit",
        }
    }

    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s {
            "debit" => Ok(CardType::Debit),
            "credit" => Ok(CardType::Credit),
            other => Err(EngineError::validation(format!(
                "Unknown card type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Active,
    Blocked,
    Expired,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Active => "active",
            CardStatus::Blocked => "blocked",
            CardStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s {
            "active" => Ok(CardStatus::Active),
            "blocked" => Ok(CardStatus::Blocked),
            "expired" => Ok(CardStatus::Expired),
            other => Err(EngineError::validation(format!(
                "Unknown card status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTxType {
    Purchase,
    AtmWithdrawal,
    OnlinePayment,
    Refund,
    Fee,
}

impl CardTxType {
    /// Purchase, ATM withdrawal, and online payment consume spend-limit
    /// headroom and account balance; refunds and fees do not.
    pub fn is_debit(&self) -> bool {
        matches!(
            self,
            CardTxType::Purchase | CardTxType::AtmWithdrawal | CardTxType::OnlinePayment
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardTxType::Purchase => "purchase",
            CardTxType::AtmWithdrawal => "atm_withdrawal",
            CardTxType::OnlinePayment => "online_payment",
            CardTxType::Refund => "refund",
            CardTxType::Fee => "fee",
        }
    }

    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s {
            "purchase" => Ok(CardTxType::Purchase),
            "atm_withdrawal" => Ok(CardTxType::AtmWithdrawal),
            "online_payment" => Ok(CardTxType::OnlinePayment),
            "refund" => Ok(CardTxType::Refund),
            "fee" => Ok(CardTxType::Fee),
            other => Err(EngineError::validation(format!(
                "Unknown card transaction type '{}'",
                other
            ))),
        }
    }
}
