// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, crate_version, value_parser};

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
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .help("Date as YYYY-MM-DD (defaults to today)")
}

fn money_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .allow_negative_numbers(true)
        .help(help)
}

fn granularity_arg() -> Arg {
    Arg::new("granularity")
        .long("granularity")
        .short('g')
        .value_parser(["day", "week", "month"])
        .help("Trend bucket width (defaults to the configured value)")
}

pub fn build_cli() -> Command {
    Command::new("logbook")
        .version(crate_version!())
        .about("Record products, sales and expenses; view KPIs; export to a spreadsheet")
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("product")
                .about("Products and services")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(money_arg("price", "Unit price").required(true))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("sale")
                .about("Record and list sales")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("product").long("product").help("Product name"))
                        .arg(
                            Arg::new("quantity")
                                .long("quantity")
                                .short('q')
                                .value_parser(value_parser!(i64))
                                .allow_negative_numbers(true)
                                .requires("product")
                                .help("Units sold (defaults to 1)"),
                        )
                        .arg(money_arg("amount", "Sale amount when no product is given"))
                        .group(
                            ArgGroup::new("source")
                                .args(["product", "amount"])
                                .required(true),
                        )
                        .arg(date_arg())
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and list expenses")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("item").long("item").required(true))
                        .arg(money_arg("amount", "Amount spent").required(true))
                        .arg(date_arg())
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Income, expenses, profit and cashflow trend")
                .arg(granularity_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print as pretty JSON"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write all records and the summary to an .xlsx workbook")
                .arg(Arg::new("out").long("out").short('o').help("Output path"))
                .arg(granularity_arg())
                .arg(
                    Arg::new("no-trend")
                        .long("no-trend")
                        .action(ArgAction::SetTrue)
                        .help("Skip the Trend sheet"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
}
