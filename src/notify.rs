// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Notification outbox. Rows are written strictly after the financial unit
//! of work has committed; a failure here never changes the reported outcome
//! of the operation itself.

use log::warn;
use rusqlite::{Connection, params};

pub fn send(
    conn: &Connection,
    customer_id: i64,
    title: &str,
    content: &str,
    action_link: Option<&str>,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO notifications(customer_id, title, content, action_link)
         VALUES (?1, ?2, ?3, ?4)",
        params![customer_id, title, content, action_link],
    )?;
    Ok(())
}

/// Post-commit variant: logs and swallows failures.
pub fn send_best_effort(
    conn: &Connection,
    customer_id: i64,
    title: &str,
    content: &str,
    action_link: Option<&str>,
) {
    if let Err(e) = send(conn, customer_id, title, content, action_link) {
        warn!("Notification '{}' for customer {} failed: {}", title, customer_id, e);
    }
}
