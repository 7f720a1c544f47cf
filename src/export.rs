// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::collections::HashMap;
use std::path::Path;

use crate::error::LedgerResult;
use crate::ledger::{CashflowTrend, KpiSnapshot};
use crate::models::{Expense, Income, Product};

pub const SHEET_PRODUCTS: &str = "Products";
pub const SHEET_INCOME: &str = "Income";
pub const SHEET_EXPENSES: &str = "Expenses";
pub const SHEET_SUMMARY: &str = "Summary";
pub const SHEET_TREND: &str = "Trend";

/// Everything that goes into one workbook.
pub struct ExportData<'a> {
    pub products: &'a [Product],
    pub income: &'a [Income],
    pub expenses: &'a [Expense],
    pub snapshot: &'a KpiSnapshot,
    pub trend: Option<&'a CashflowTrend>,
}

/// Writes the workbook to `path`, replacing whatever was there.
pub fn write_workbook(path: &Path, data: &ExportData<'_>) -> LedgerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let styles = Styles::new();
    let mut wb = Workbook::new();

    write_products(wb.add_worksheet(), &styles, data.products)?;
    write_income(wb.add_worksheet(), &styles, data.income, data.products)?;
    write_expenses(wb.add_worksheet(), &styles, data.expenses)?;
    write_summary(wb.add_worksheet(), &styles, data.snapshot)?;
    if let Some(trend) = data.trend {
        write_trend(wb.add_worksheet(), &styles, trend)?;
    }

    wb.save(path)?;
    tracing::info!(
        path = %path.display(),
        products = data.products.len(),
        income = data.income.len(),
        expenses = data.expenses.len(),
        "workbook written"
    );
    Ok(())
}

struct Styles {
    bold: Format,
    date: Format,
}

impl Styles {
    fn new() -> Self {
        Styles {
            bold: Format::new().set_bold(),
            date: Format::new().set_num_format("yyyy-mm-dd"),
        }
    }
}

// 2dp at the edge only; the ledger keeps full precision.
fn money(d: Decimal) -> f64 {
    d.round_dp(2).to_f64().unwrap_or_default()
}

fn header(ws: &mut Worksheet, styles: &Styles, cols: &[&str]) -> Result<(), XlsxError> {
    for (c, h) in cols.iter().enumerate() {
        ws.write_string_with_format(0, c as u16, *h, &styles.bold)?;
    }
    Ok(())
}

fn write_products(ws: &mut Worksheet, styles: &Styles, rows: &[Product]) -> Result<(), XlsxError> {
    ws.set_name(SHEET_PRODUCTS)?;
    header(ws, styles, &["ID", "Name", "Price", "Category"])?;
    for (i, p) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        ws.write_number(r, 0, p.id as f64)?;
        ws.write_string(r, 1, p.name.as_str())?;
        ws.write_number(r, 2, money(p.price))?;
        ws.write_string(r, 3, p.category.as_deref().unwrap_or_default())?;
    }
    ws.set_column_width(1, 24.0)?;
    Ok(())
}

fn write_income(
    ws: &mut Worksheet,
    styles: &Styles,
    rows: &[Income],
    products: &[Product],
) -> Result<(), XlsxError> {
    let by_id: HashMap<i64, &Product> = products.iter().map(|p| (p.id, p)).collect();
    ws.set_name(SHEET_INCOME)?;
    header(
        ws,
        styles,
        &["ID", "Date", "Product", "Quantity", "Unit Price", "Total", "Description"],
    )?;
    for (i, inc) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        let product = inc.product_id.and_then(|id| by_id.get(&id));
        ws.write_number(r, 0, inc.id as f64)?;
        ws.write_datetime_with_format(r, 1, &inc.date, &styles.date)?;
        ws.write_string(r, 2, product.map(|p| p.name.as_str()).unwrap_or_default())?;
        ws.write_number(r, 3, inc.quantity as f64)?;
        // Unit price is derived from the stored total, not the product row.
        let unit = inc.amount / Decimal::from(inc.quantity.max(1));
        ws.write_number(r, 4, money(unit))?;
        ws.write_number(r, 5, money(inc.amount))?;
        ws.write_string(r, 6, inc.description.as_deref().unwrap_or_default())?;
    }
    ws.set_column_width(1, 12.0)?;
    ws.set_column_width(2, 24.0)?;
    Ok(())
}

fn write_expenses(ws: &mut Worksheet, styles: &Styles, rows: &[Expense]) -> Result<(), XlsxError> {
    ws.set_name(SHEET_EXPENSES)?;
    header(ws, styles, &["ID", "Date", "Item", "Category", "Amount"])?;
    for (i, e) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        ws.write_number(r, 0, e.id as f64)?;
        ws.write_datetime_with_format(r, 1, &e.date, &styles.date)?;
        ws.write_string(r, 2, e.item.as_str())?;
        ws.write_string(r, 3, e.category.as_deref().unwrap_or_default())?;
        ws.write_number(r, 4, money(e.amount))?;
    }
    ws.set_column_width(1, 12.0)?;
    ws.set_column_width(2, 24.0)?;
    Ok(())
}

fn write_summary(ws: &mut Worksheet, styles: &Styles, s: &KpiSnapshot) -> Result<(), XlsxError> {
    ws.set_name(SHEET_SUMMARY)?;
    header(ws, styles, &["Metric", "Value"])?;
    ws.write_string(1, 0, "Total revenue")?;
    ws.write_number(1, 1, money(s.total_revenue))?;
    ws.write_string(2, 0, "Total expenses")?;
    ws.write_number(2, 1, money(s.total_expenses))?;
    ws.write_string(3, 0, "Net profit")?;
    ws.write_number(3, 1, money(s.net_profit))?;
    ws.write_string(4, 0, "Sales recorded")?;
    ws.write_number(4, 1, s.income_count as f64)?;
    ws.write_string(5, 0, "Expenses recorded")?;
    ws.write_number(5, 1, s.expense_count as f64)?;
    ws.write_string(6, 0, "As of")?;
    match &s.as_of {
        Some(d) => ws.write_datetime_with_format(6, 1, d, &styles.date)?,
        None => ws.write_string(6, 1, "-")?,
    };
    ws.set_column_width(0, 20.0)?;
    Ok(())
}

fn write_trend(ws: &mut Worksheet, styles: &Styles, trend: &CashflowTrend) -> Result<(), XlsxError> {
    ws.set_name(SHEET_TREND)?;
    header(ws, styles, &["Period", "Income", "Expenses", "Net", "Balance"])?;
    for (i, p) in trend.iter().enumerate() {
        let r = i as u32 + 1;
        ws.write_string(r, 0, p.period.to_string())?;
        ws.write_number(r, 1, money(p.income))?;
        ws.write_number(r, 2, money(p.expenses))?;
        ws.write_number(r, 3, money(p.net_amount))?;
        ws.write_number(r, 4, money(p.running_balance))?;
    }
    ws.set_column_width(0, 12.0)?;
    Ok(())
}
