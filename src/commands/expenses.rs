// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::{Draft, ExpenseDraft};
use crate::store::Store;
use crate::utils::{date_or_today, fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result};

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            add(store, sub)?;
        }
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn add(store: &mut Store, sub: &clap::ArgMatches) -> Result<i64> {
    let item = sub.get_one::<String>("item").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = date_or_today(sub.get_one::<String>("date"))?;
    let category = sub.get_one::<String>("category").cloned();

    let id = store
        .insert(&Draft::Expense(ExpenseDraft {
            date,
            amount,
            item: item.clone(),
            category,
        }))
        .with_context(|| format!("Expense '{}' rejected", item))?;
    println!("Expense saved: {} {} on {}", item, amount, date);
    Ok(id)
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut expenses = store.list_expenses()?;
    expenses.reverse();
    if !maybe_print_json(json_flag, jsonl_flag, &expenses)? {
        let ccy = Settings::load(store.conn())?.currency;
        let rows = expenses
            .iter()
            .map(|e| {
                vec![
                    e.date.to_string(),
                    e.item.clone(),
                    e.category.clone().unwrap_or_default(),
                    fmt_money(&e.amount, &ccy),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Item", "Category", "Amount"], rows)
        );
    }
    Ok(())
}
