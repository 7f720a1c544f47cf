// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::{Draft, ProductDraft};
use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
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
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let price = parse_decimal(sub.get_one::<String>("price").unwrap())?;
    let category = sub.get_one::<String>("category").cloned();

    let id = store
        .insert(&Draft::Product(ProductDraft {
            name: name.clone(),
            price,
            category,
        }))
        .with_context(|| format!("Product '{}' rejected", name))?;
    println!("Added product '{}' at {}", name, price);
    Ok(id)
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let products = store.list_products()?;
    if !maybe_print_json(json_flag, jsonl_flag, &products)? {
        let ccy = Settings::load(store.conn())?.currency;
        let rows = products
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.name.clone(),
                    fmt_money(&p.price, &ccy),
                    p.category.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["ID", "Name", "Price", "Category"], rows));
    }
    Ok(())
}
