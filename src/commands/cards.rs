// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cards::{
    self, CardRequestOptions, CardTransactionOptions, CardTransactionUpdate,
};
use crate::idgen::IdGenerator;
use crate::models::{CardTxType, CardType, TransactionStatus};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, ids: &mut IdGenerator, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("request", sub)) => request(conn, ids, sub)?,
        Some(("toggle", sub)) => toggle(conn, sub)?,
        Some(("pin", sub)) => pin(conn, sub)?,
        Some(("report", sub)) => report(conn, sub)?,
        Some(("stats", sub)) => stats(conn, sub)?,
        Some(("tx", sub)) => tx(conn, ids, sub)?,
        _ => {}
    }
    Ok(())
}

fn card_id(sub: &clap::ArgMatches) -> Result<i64> {
    Ok(sub.get_one::<String>("card").unwrap().trim().parse()?)
}

fn request(conn: &mut Connection, ids: &mut IdGenerator, sub: &clap::ArgMatches) -> Result<()> {
    let limit = match sub.get_one::<String>("limit") {
        Some(raw) => Some(parse_decimal(raw.trim())?),
        None => None,
    };
    let opts = CardRequestOptions {
        account_id: sub.get_one::<String>("account").unwrap().trim().parse()?,
        card_type: CardType::parse(sub.get_one::<String>("type").unwrap().trim())?,
        requested_limit: limit,
        expedited: sub.get_flag("expedited"),
    };
    let res = cards::request_card(conn, ids, &opts)?;
    if res.success {
        println!("{}", res.message);
        if let (Some(number), Some(pin), Some(fee), Some(balance)) = (
            &res.full_card_number,
            &res.pin,
            &res.fees_charged,
            &res.new_balance,
        ) {
            println!("  card number: {}", number);
            println!("  PIN:         {}", pin);
            println!("  fee charged: {} (balance {})", fee, balance);
        }
    } else {
        println!("Failed: {}", res.message);
    }
    Ok(())
}

fn toggle(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let res = cards::toggle_status(conn, card_id(sub)?)?;
    println!("{}", res.message);
    Ok(())
}

fn pin(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let new_pin = sub.get_one::<String>("new-pin").unwrap().trim();
    let res = cards::change_pin(conn, card_id(sub)?, new_pin)?;
    println!("{}", res.message);
    Ok(())
}

fn report(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let reason = sub.get_one::<String>("reason").unwrap().trim();
    let res = cards::report_card(conn, card_id(sub)?, reason)?;
    println!("{}", res.message);
    Ok(())
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = cards::statistics(conn, card_id(sub)?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = vec![
            vec!["Transactions".to_string(), data.total_transactions.to_string()],
            vec!["Total spent".to_string(), data.total_spent.to_string()],
            vec!["Total received".to_string(), data.total_received.to_string()],
            vec!["This month".to_string(), data.month_transactions.to_string()],
            vec!["Spent this month".to_string(), data.month_spent.to_string()],
            vec!["Daily headroom".to_string(), data.remaining_daily.to_string()],
            vec!["Monthly headroom".to_string(), data.remaining_monthly.to_string()],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}

fn tx(conn: &mut Connection, ids: &mut IdGenerator, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => tx_add(conn, ids, sub)?,
        Some(("edit", sub)) => tx_edit(conn, sub)?,
        Some(("delete", sub)) => tx_delete(conn, sub)?,
        Some(("list", sub)) => tx_list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn opt(sub: &clap::ArgMatches, name: &str) -> Option<String> {
    sub.get_one::<String>(name).map(|s| s.trim().to_string())
}

fn tx_add(conn: &mut Connection, ids: &mut IdGenerator, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(raw) => Some(parse_date(raw.trim())?),
        None => None,
    };
    let status = match opt(sub, "status") {
        Some(s) => Some(TransactionStatus::parse(&s)?),
        None => None,
    };
    let opts = CardTransactionOptions {
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?,
        r#type: CardTxType::parse(sub.get_one::<String>("type").unwrap().trim())?,
        merchant: opt(sub, "merchant"),
        location: opt(sub, "location"),
        currency: opt(sub, "currency"),
        date,
        status,
    };
    let res = cards::add_transaction(conn, ids, card_id(sub)?, &opts)?;
    if res.success {
        println!(
            "{} (balance {})",
            res.message,
            res.balance
                .map(|b| b.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    } else {
        println!("Failed: {}", res.message);
    }
    Ok(())
}

fn tx_edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let tx_id: i64 = sub.get_one::<String>("id").unwrap().trim().parse()?;
    let amount = match sub.get_one::<String>("amount") {
        Some(raw) => Some(parse_decimal(raw.trim())?),
        None => None,
    };
    let r#type = match opt(sub, "type") {
        Some(s) => Some(CardTxType::parse(&s)?),
        None => None,
    };
    let date = match sub.get_one::<String>("date") {
        Some(raw) => Some(parse_date(raw.trim())?),
        None => None,
    };
    let status = match opt(sub, "status") {
        Some(s) => Some(TransactionStatus::parse(&s)?),
        None => None,
    };
    let updates = CardTransactionUpdate {
        amount,
        r#type,
        merchant: opt(sub, "merchant"),
        location: opt(sub, "location"),
        date,
        status,
    };
    let res = cards::edit_transaction(conn, card_id(sub)?, tx_id, &updates)?;
    if res.success {
        println!("{}", res.message);
    } else {
        println!("Failed: {}", res.message);
    }
    Ok(())
}

fn tx_delete(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let tx_id: i64 = sub.get_one::<String>("id").unwrap().trim().parse()?;
    let res = cards::delete_transaction(conn, card_id(sub)?, tx_id)?;
    if res.success {
        println!("{}", res.message);
    } else {
        println!("Failed: {}", res.message);
    }
    Ok(())
}

fn tx_list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = cards::list_card_transactions(conn, card_id(sub)?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.r#type.as_str().to_string(),
                    t.merchant.clone(),
                    fmt_money(&t.amount, &t.currency),
                    t.status.as_str().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Type", "Merchant", "Amount", "Status"], rows)
        );
    }
    Ok(())
}
