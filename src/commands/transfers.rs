// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::idgen::IdGenerator;
use crate::ledger::{
    self, DepositRequest, FeesOption, PaypalRequest, TransactionResult, TransferRequest,
    TransferType, WireTransferRequest, WithdrawRequest,
};
use crate::models::TransactionStatus;
use crate::utils::parse_decimal;
use anyhow::Result;
use rusqlite::Connection;

fn print_result(res: &TransactionResult) {
    if res.success {
        println!(
            "{} (ref {}, status {}, balance {})",
            res.message,
            res.reference.as_deref().unwrap_or("-"),
            res.status.as_str(),
            res.balance
                .map(|b| b.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    } else {
        println!("Failed: {}", res.message);
    }
}

fn opt(sub: &clap::ArgMatches, name: &str) -> Option<String> {
    sub.get_one::<String>(name).map(|s| s.trim().to_string())
}

pub fn deposit(conn: &mut Connection, ids: &mut IdGenerator, sub: &clap::ArgMatches) -> Result<()> {
    let req = DepositRequest {
        account_id: sub.get_one::<String>("account").unwrap().trim().parse()?,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?,
        description: sub.get_one::<String>("description").unwrap().to_string(),
        source: opt(sub, "source"),
        send_receipt: sub.get_flag("receipt"),
    };
    print_result(&ledger::deposit(conn, ids, &req)?);
    Ok(())
}

pub fn withdraw(conn: &mut Connection, ids: &mut IdGenerator, sub: &clap::ArgMatches) -> Result<()> {
    let req = WithdrawRequest {
        account_id: sub.get_one::<String>("account").unwrap().trim().parse()?,
        pin: sub.get_one::<String>("pin").unwrap().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?,
        description: sub.get_one::<String>("description").unwrap().to_string(),
        send_receipt: sub.get_flag("receipt"),
    };
    print_result(&ledger::withdraw(conn, ids, &req)?);
    Ok(())
}

pub fn transfer(conn: &mut Connection, ids: &mut IdGenerator, sub: &clap::ArgMatches) -> Result<()> {
    let forced_status = match opt(sub, "force-status") {
        Some(s) => Some(TransactionStatus::parse(&s)?),
        None => None,
    };
    let req = TransferRequest {
        from_account_id: sub.get_one::<String>("from").unwrap().trim().parse()?,
        pin: sub.get_one::<String>("pin").unwrap().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?,
        country: sub.get_one::<String>("country").unwrap().trim().to_string(),
        account_number: sub
            .get_one::<String>("account-number")
            .unwrap()
            .trim()
            .to_string(),
        recipient_name: sub.get_one::<String>("recipient").unwrap().trim().to_string(),
        bank_name: opt(sub, "bank-name"),
        routing_number: opt(sub, "routing-number"),
        sort_code: opt(sub, "sort-code"),
        iban: opt(sub, "iban"),
        swift_code: opt(sub, "swift"),
        bank_address: opt(sub, "bank-address"),
        description: opt(sub, "description"),
        forced_status,
        transfer_type: Some(TransferType::parse(
            sub.get_one::<String>("type").unwrap().trim(),
        )?),
        send_receipt: sub.get_flag("receipt"),
    };
    print_result(&ledger::transfer(conn, ids, &req)?);
    Ok(())
}

pub fn wire(conn: &mut Connection, ids: &mut IdGenerator, sub: &clap::ArgMatches) -> Result<()> {
    let req = WireTransferRequest {
        from_account_id: sub.get_one::<String>("from").unwrap().trim().parse()?,
        pin: sub.get_one::<String>("pin").unwrap().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?,
        beneficiary_name: sub
            .get_one::<String>("beneficiary")
            .unwrap()
            .trim()
            .to_string(),
        beneficiary_account: sub
            .get_one::<String>("beneficiary-account")
            .unwrap()
            .trim()
            .to_string(),
        beneficiary_bank_name: sub
            .get_one::<String>("beneficiary-bank")
            .unwrap()
            .trim()
            .to_string(),
        beneficiary_bank_swift: sub
            .get_one::<String>("beneficiary-swift")
            .unwrap()
            .trim()
            .to_string(),
        country: sub.get_one::<String>("country").unwrap().trim().to_string(),
        iban: opt(sub, "iban"),
        sort_code: opt(sub, "sort-code"),
        routing_number: opt(sub, "routing-number"),
        purpose: sub.get_one::<String>("purpose").unwrap().to_string(),
        instructions: opt(sub, "instructions"),
        fees_option: FeesOption::parse(sub.get_one::<String>("fees").unwrap().trim()),
        send_receipt: sub.get_flag("receipt"),
    };
    let res = ledger::wire_transfer(conn, ids, &req)?;
    print_result(&res);
    if let (Some(name), Some(bank)) = (&res.receiver_name, &res.receiver_bank) {
        println!("Receiver: {} at {}", name, bank);
    }
    Ok(())
}

pub fn paypal(conn: &mut Connection, ids: &mut IdGenerator, sub: &clap::ArgMatches) -> Result<()> {
    let req = PaypalRequest {
        from_account_id: sub.get_one::<String>("from").unwrap().trim().parse()?,
        pin: sub.get_one::<String>("pin").unwrap().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?,
        destination_email: sub.get_one::<String>("email").unwrap().trim().to_string(),
        description: opt(sub, "description"),
        send_receipt: sub.get_flag("receipt"),
    };
    print_result(&ledger::paypal_transfer(conn, ids, &req)?);
    Ok(())
}
