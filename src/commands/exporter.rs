// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::export::{ExportData, write_workbook};
use crate::ledger::{Granularity, LedgerAggregator};
use crate::store::Store;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn handle(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let out = export(store, sub)?;
    println!("{} updated", out.display());
    Ok(())
}

pub fn export(store: &Store, sub: &clap::ArgMatches) -> Result<PathBuf> {
    let settings = Settings::load(store.conn())?;
    let out = match sub.get_one::<String>("out") {
        Some(p) => PathBuf::from(p.trim()),
        None => settings.resolved_export_path()?,
    };
    let granularity = match sub.get_one::<String>("granularity") {
        Some(g) => g.parse::<Granularity>()?,
        None => settings.granularity,
    };
    let with_trend = !sub.get_flag("no-trend");

    let products = store.list_products()?;
    let income = store.list_income()?;
    let expenses = store.list_expenses()?;
    // One read of each table feeds both the sheets and the summary.
    let report = LedgerAggregator::new(granularity)
        .report(&income, &expenses)
        .context("Failed to aggregate ledger")?;

    write_workbook(
        &out,
        &ExportData {
            products: &products,
            income: &income,
            expenses: &expenses,
            snapshot: &report.snapshot,
            trend: with_trend.then_some(&report.trend),
        },
    )
    .with_context(|| format!("Export to {}", out.display()))?;
    Ok(out)
}
