// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_customer_email, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;

#[derive(Serialize)]
struct NotificationRow {
    created_at: String,
    title: String,
    content: String,
    action_link: Option<String>,
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("customer").unwrap().trim();
    let customer_id = id_for_customer_email(conn, email)?;

    let mut stmt = conn.prepare(
        "SELECT created_at, title, content, action_link FROM notifications
         WHERE customer_id=?1 ORDER BY id DESC",
    )?;
    let rows = stmt.query_map(params![customer_id], |r| {
        Ok(NotificationRow {
            created_at: r.get(0)?,
            title: r.get(1)?,
            content: r.get(2)?,
            action_link: r.get(3)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|n| {
                vec![
                    n.created_at.clone(),
                    n.title.clone(),
                    n.content.clone(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["When", "Title", "Content"], rows));
    }
    Ok(())
}
