// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::idgen::IdGenerator;
use crate::ledger::{self, OpenAccountRequest};
use crate::utils::{fmt_money, id_for_customer_email, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, ids: &mut IdGenerator, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("open", sub)) => open(conn, ids, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("statement", sub)) => statement(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn open(conn: &mut Connection, ids: &mut IdGenerator, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("customer").unwrap().trim();
    let currency = sub
        .get_one::<String>("currency")
        .unwrap()
        .trim()
        .to_uppercase();
    let customer_id = id_for_customer_email(conn, email)?;

    let account = ledger::open_account(
        conn,
        ids,
        &OpenAccountRequest {
            customer_id,
            currency,
        },
    )?;
    println!("Opened account {} for {}", account.account_number, email);
    println!("  routing number: {}", account.routing_number);
    println!("  SWIFT/BIC:      {}", account.swift_bic);
    println!("  IBAN:           {}", account.iban);
    println!("  sort code:      {}", account.sort_code);
    println!("  PIN:            {}", account.pin);
    Ok(())
}

#[derive(Serialize)]
struct AccountRow {
    id: i64,
    customer: String,
    account_number: String,
    balance: String,
    currency: String,
    status: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT a.id, c.email, a.account_number, a.balance, a.currency, a.status
         FROM accounts a JOIN customers c ON a.customer_id=c.id ORDER BY a.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(AccountRow {
            id: r.get(0)?,
            customer: r.get(1)?,
            account_number: r.get(2)?,
            balance: r.get(3)?,
            currency: r.get(4)?,
            status: r.get(5)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|a| {
                vec![
                    a.id.to_string(),
                    a.customer.clone(),
                    a.account_number.clone(),
                    a.balance.clone(),
                    a.currency.clone(),
                    a.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Customer", "Account", "Balance", "CCY", "Status"],
                rows
            )
        );
    }
    Ok(())
}

fn statement(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let account_id: i64 = sub.get_one::<String>("account").unwrap().trim().parse()?;
    let limit = sub.get_one::<usize>("limit").copied();
    let data = ledger::statement(conn, account_id, limit)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.reference.clone(),
                    t.r#type.as_str().to_string(),
                    fmt_money(&t.amount, &t.currency),
                    t.status.as_str().to_string(),
                    t.to_account_id
                        .map(|id| id.to_string())
                        .unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Reference", "Type", "Amount", "Status", "To"], rows)
        );
    }
    Ok(())
}
