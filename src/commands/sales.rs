// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::{Draft, IncomeDraft, SaleSource};
use crate::store::Store;
use crate::utils::{date_or_today, fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;

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
    let date = date_or_today(sub.get_one::<String>("date"))?;
    let description = sub.get_one::<String>("description").cloned();

    let (source, label) = if let Some(name) = sub.get_one::<String>("product") {
        let product = store.product_by_name(name)?;
        let quantity = *sub.get_one::<i64>("quantity").unwrap_or(&1);
        (
            SaleSource::Product {
                product_id: product.id,
                quantity,
            },
            format!("{} x {}", quantity, product.name),
        )
    } else {
        let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
        (SaleSource::Amount(amount), amount.to_string())
    };

    let id = store
        .insert(&Draft::Income(IncomeDraft {
            date,
            source,
            description,
        }))
        .with_context(|| format!("Sale '{}' rejected", label))?;
    println!("Sale recorded: {} on {}", label, date);
    Ok(id)
}

#[derive(Serialize)]
pub struct SaleRow {
    pub id: i64,
    pub date: String,
    pub product: String,
    pub quantity: i64,
    pub total: String,
    pub description: String,
}

pub fn query_rows(store: &Store) -> Result<Vec<SaleRow>> {
    let names: HashMap<i64, String> = store
        .list_products()?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let rows = store
        .list_income()?
        .into_iter()
        .rev()
        .map(|i| SaleRow {
            id: i.id,
            date: i.date.to_string(),
            product: i
                .product_id
                .and_then(|id| names.get(&id).cloned())
                .unwrap_or_default(),
            quantity: i.quantity,
            total: i.amount.to_string(),
            description: i.description.unwrap_or_default(),
        })
        .collect();
    Ok(rows)
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let ccy = Settings::load(store.conn())?.currency;
        let mut rows = Vec::new();
        for r in &data {
            let total = parse_decimal(&r.total)?;
            rows.push(vec![
                r.date.clone(),
                r.product.clone(),
                r.quantity.to_string(),
                fmt_money(&total, &ccy),
                r.description.clone(),
            ]);
        }
        println!(
            "{}",
            pretty_table(&["Date", "Product", "Qty", "Total", "Description"], rows)
        );
    }
    Ok(())
}
