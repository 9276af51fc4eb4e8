// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use vaultledger::idgen::IdGenerator;
use vaultledger::{cli, commands, db, utils};

fn main() -> Result<()> {
    env_logger::init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;
    let mut ids = IdGenerator::new();

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("config", sub)) => {
            if let Some(ccy) = sub.get_one::<String>("base-currency") {
                utils::set_base_currency(&conn, &ccy.trim().to_uppercase())?;
                println!("Base currency set to {}", ccy.trim().to_uppercase());
            }
            if let Some(country) = sub.get_one::<String>("home-country") {
                utils::set_home_country(&conn, &country.trim().to_uppercase())?;
                println!("Home country set to {}", country.trim().to_uppercase());
            }
        }
        Some(("customer", sub)) => commands::customers::handle(&conn, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&mut conn, &mut ids, sub)?,
        Some(("deposit", sub)) => commands::transfers::deposit(&mut conn, &mut ids, sub)?,
        Some(("withdraw", sub)) => commands::transfers::withdraw(&mut conn, &mut ids, sub)?,
        Some(("transfer", sub)) => commands::transfers::transfer(&mut conn, &mut ids, sub)?,
        Some(("wire", sub)) => commands::transfers::wire(&mut conn, &mut ids, sub)?,
        Some(("paypal", sub)) => commands::transfers::paypal(&mut conn, &mut ids, sub)?,
        Some(("card", sub)) => commands::cards::handle(&mut conn, &mut ids, sub)?,
        Some(("inbox", sub)) => commands::inbox::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
