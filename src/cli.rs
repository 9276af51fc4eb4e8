// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn receipt_flag(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("receipt")
            .long("receipt")
            .action(ArgAction::SetTrue)
            .help("Queue a receipt notification after the operation commits"),
    )
}

pub fn build_cli() -> Command {
    Command::new("vaultledger")
        .about("Ledger, transfer, and card-spend engine behind a banking dashboard")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("config")
                .about("Engine settings")
                .arg(Arg::new("base-currency").long("base-currency"))
                .arg(Arg::new("home-country").long("home-country")),
        )
        .subcommand(
            Command::new("customer")
                .about("Manage customers")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("open")
                        .arg(Arg::new("customer").long("customer").required(true).help("Customer email"))
                        .arg(Arg::new("currency").long("currency").default_value("USD")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(
                    Command::new("statement")
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("limit").long("limit").value_parser(clap::value_parser!(usize))),
                )),
        )
        .subcommand(receipt_flag(
            Command::new("deposit")
                .about("Deposit into an account")
                .arg(Arg::new("account").long("account").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("description").long("description").default_value("Deposit"))
                .arg(Arg::new("source").long("source")),
        ))
        .subcommand(receipt_flag(
            Command::new("withdraw")
                .about("Withdraw from an account")
                .arg(Arg::new("account").long("account").required(true))
                .arg(Arg::new("pin").long("pin").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("description").long("description").default_value("Withdrawal")),
        ))
        .subcommand(receipt_flag(
            Command::new("transfer")
                .about("Transfer to another account, internal or external")
                .arg(Arg::new("from").long("from").required(true))
                .arg(Arg::new("pin").long("pin").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("account-number").long("account-number").required(true))
                .arg(Arg::new("recipient").long("recipient").required(true))
                .arg(Arg::new("type").long("type").default_value("domestic").help("domestic or international"))
                .arg(Arg::new("country").long("country").default_value("US"))
                .arg(Arg::new("bank-name").long("bank-name"))
                .arg(Arg::new("routing-number").long("routing-number"))
                .arg(Arg::new("sort-code").long("sort-code"))
                .arg(Arg::new("iban").long("iban"))
                .arg(Arg::new("swift").long("swift"))
                .arg(Arg::new("bank-address").long("bank-address"))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("force-status").long("force-status").help("Administrative status override")),
        ))
        .subcommand(receipt_flag(
            Command::new("wire")
                .about("Wire transfer to a beneficiary bank")
                .arg(Arg::new("from").long("from").required(true))
                .arg(Arg::new("pin").long("pin").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("beneficiary").long("beneficiary").required(true))
                .arg(Arg::new("beneficiary-account").long("beneficiary-account").required(true))
                .arg(Arg::new("beneficiary-bank").long("beneficiary-bank").required(true))
                .arg(Arg::new("beneficiary-swift").long("beneficiary-swift").required(true))
                .arg(Arg::new("country").long("country").required(true))
                .arg(Arg::new("iban").long("iban"))
                .arg(Arg::new("sort-code").long("sort-code"))
                .arg(Arg::new("routing-number").long("routing-number"))
                .arg(Arg::new("purpose").long("purpose").default_value("Payment"))
                .arg(Arg::new("instructions").long("instructions"))
                .arg(Arg::new("fees").long("fees").default_value("shared").help("sender, beneficiary, or shared")),
        ))
        .subcommand(receipt_flag(
            Command::new("paypal")
                .about("PayPal-style transfer to an email address")
                .arg(Arg::new("from").long("from").required(true))
                .arg(Arg::new("pin").long("pin").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("description").long("description")),
        ))
        .subcommand(
            Command::new("card")
                .about("Manage cards and their transactions")
                .subcommand(
                    Command::new("request")
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("type").long("type").default_value("debit"))
                        .arg(Arg::new("limit").long("limit"))
                        .arg(
                            Arg::new("expedited")
                                .long("expedited")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(Command::new("toggle").arg(Arg::new("card").long("card").required(true)))
                .subcommand(
                    Command::new("pin")
                        .arg(Arg::new("card").long("card").required(true))
                        .arg(Arg::new("new-pin").long("new-pin").required(true)),
                )
                .subcommand(
                    Command::new("report")
                        .arg(Arg::new("card").long("card").required(true))
                        .arg(Arg::new("reason").long("reason").default_value("lost")),
                )
                .subcommand(json_flags(
                    Command::new("stats").arg(Arg::new("card").long("card").required(true)),
                ))
                .subcommand(
                    Command::new("tx")
                        .subcommand(
                            Command::new("add")
                                .arg(Arg::new("card").long("card").required(true))
                                .arg(Arg::new("amount").long("amount").required(true))
                                .arg(Arg::new("type").long("type").default_value("purchase"))
                                .arg(Arg::new("merchant").long("merchant"))
                                .arg(Arg::new("location").long("location"))
                                .arg(Arg::new("currency").long("currency"))
                                .arg(Arg::new("date").long("date"))
                                .arg(Arg::new("status").long("status")),
                        )
                        .subcommand(
                            Command::new("edit")
                                .arg(Arg::new("card").long("card").required(true))
                                .arg(Arg::new("id").long("id").required(true))
                                .arg(Arg::new("amount").long("amount"))
                                .arg(Arg::new("type").long("type"))
                                .arg(Arg::new("merchant").long("merchant"))
                                .arg(Arg::new("location").long("location"))
                                .arg(Arg::new("date").long("date"))
                                .arg(Arg::new("status").long("status")),
                        )
                        .subcommand(
                            Command::new("delete")
                                .arg(Arg::new("card").long("card").required(true))
                                .arg(Arg::new("id").long("id").required(true)),
                        )
                        .subcommand(json_flags(
                            Command::new("list").arg(Arg::new("card").long("card").required(true)),
                        )),
                ),
        )
        .subcommand(json_flags(
            Command::new("inbox")
                .about("Notifications for a customer")
                .arg(Arg::new("customer").long("customer").required(true).help("Customer email")),
        ))
}
