// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::ledger::{Granularity, LedgerAggregator, LedgerReport};
use crate::store::Store;
use crate::utils::{fmt_money, pretty_table};
use anyhow::{Context, Result};
use serde_json::json;

pub fn handle(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let granularity = sub
        .get_one::<String>("granularity")
        .map(|g| g.parse::<Granularity>())
        .transpose()?;
    show(store, granularity, sub.get_flag("json"))
}

/// Aggregates the store with the given bucket width, falling back to the
/// configured one.
pub fn build(store: &Store, granularity: Option<Granularity>) -> Result<LedgerReport> {
    let settings = Settings::load(store.conn())?;
    let aggregator = LedgerAggregator::new(granularity.unwrap_or(settings.granularity));
    aggregator
        .report_from_store(store)
        .context("Failed to aggregate ledger")
}

pub fn show(store: &Store, granularity: Option<Granularity>, json_flag: bool) -> Result<()> {
    let report = build(store, granularity)?;
    if json_flag {
        let v = json!({
            "snapshot": report.snapshot,
            "granularity": report.trend.granularity(),
            "trend": report.trend.points(),
            "closing_balance": report.trend.closing_balance(),
        });
        println!("{}", serde_json::to_string_pretty(&v)?);
        return Ok(());
    }

    let ccy = Settings::load(store.conn())?.currency;
    let s = &report.snapshot;
    println!(
        "{}",
        pretty_table(
            &["Income", "Expenses", "Profit"],
            vec![vec![
                fmt_money(&s.total_revenue, &ccy),
                fmt_money(&s.total_expenses, &ccy),
                fmt_money(&s.net_profit, &ccy),
            ]],
        )
    );
    if let Some(d) = s.as_of {
        println!("As of {} ({} sales, {} expenses)", d, s.income_count, s.expense_count);
    }

    if report.trend.is_empty() {
        println!("No cashflow recorded yet.");
        return Ok(());
    }
    println!("Cashflow trend ({})", report.trend.granularity());
    let rows = report
        .trend
        .iter()
        .map(|p| {
            vec![
                p.period.to_string(),
                fmt_money(&p.income, &ccy),
                fmt_money(&p.expenses, &ccy),
                fmt_money(&p.net_amount, &ccy),
                fmt_money(&p.running_balance, &ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Period", "Income", "Expenses", "Net", "Balance"], rows)
    );
    Ok(())
}
