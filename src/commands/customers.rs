// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rusqlite::params;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let email = sub.get_one::<String>("email").unwrap().trim().to_string();
    conn.execute(
        "INSERT INTO customers(name, email) VALUES (?1, ?2)",
        params![name, email],
    )?;
    println!("Added customer {} <{}>", name, email);
    Ok(())
}

#[derive(Serialize)]
struct CustomerRow {
    id: i64,
    name: String,
    email: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM customers ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(CustomerRow {
            id: r.get(0)?,
            name: r.get(1)?,
            email: r.get(2)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|c| vec![c.id.to_string(), c.name.clone(), c.email.clone()])
            .collect();
        println!("{}", pretty_table(&["ID", "Name", "Email"], rows));
    }
    Ok(())
}
