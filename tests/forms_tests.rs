// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use logbook::commands::{expenses, products, sales};
use logbook::store::Store;
use logbook::cli;
use rust_decimal::Decimal;

fn run<F>(store: &mut Store, args: &[&str], f: F) -> anyhow::Result<i64>
where
    F: Fn(&mut Store, &clap::ArgMatches) -> anyhow::Result<i64>,
{
    let matches = cli::build_cli().get_matches_from(args);
    let (_, group) = matches.subcommand().expect("command group");
    let (_, sub) = group.subcommand().expect("action");
    f(store, sub)
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn sale_by_product_uses_quantity_and_price() {
    let mut store = Store::open_in_memory().unwrap();
    run(
        &mut store,
        &["logbook", "product", "add", "--name", "Bread", "--price", "850.5"],
        products::add,
    )
    .unwrap();
    run(
        &mut store,
        &[
            "logbook", "sale", "add", "--product", " Bread ", "-q", "3", "--date", "2025-01-02",
        ],
        sales::add,
    )
    .unwrap();

    let rows = sales::query_rows(&store).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product, "Bread");
    assert_eq!(rows[0].quantity, 3);
    assert_eq!(dec(&rows[0].total), dec("2551.5"));
    assert_eq!(rows[0].date, "2025-01-02");
}

#[test]
fn sale_list_is_newest_first() {
    let mut store = Store::open_in_memory().unwrap();
    for date in ["2025-01-01", "2025-01-03", "2025-01-02"] {
        run(
            &mut store,
            &["logbook", "sale", "add", "--amount", "5", "--date", date],
            sales::add,
        )
        .unwrap();
    }
    let rows = sales::query_rows(&store).unwrap();
    let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, vec!["2025-01-03", "2025-01-02", "2025-01-01"]);
}

#[test]
fn negative_sale_amount_is_rejected_without_insert() {
    let mut store = Store::open_in_memory().unwrap();
    let err = run(
        &mut store,
        &["logbook", "sale", "add", "--amount", "-10", "--date", "2025-01-02"],
        sales::add,
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("amount must be greater than zero"));
    assert!(store.list_income().unwrap().is_empty());
}

#[test]
fn sale_of_missing_product_is_rejected() {
    let mut store = Store::open_in_memory().unwrap();
    let err = run(
        &mut store,
        &["logbook", "sale", "add", "--product", "Ghost"],
        sales::add,
    )
    .unwrap_err();
    assert!(err.to_string().contains("not found"));
    assert!(store.list_income().unwrap().is_empty());
}

#[test]
fn expense_with_bad_date_is_rejected() {
    let mut store = Store::open_in_memory().unwrap();
    let err = run(
        &mut store,
        &[
            "logbook", "expense", "add", "--item", "Diesel", "--amount", "9000", "--date",
            "2025-13-01",
        ],
        expenses::add,
    )
    .unwrap_err();
    assert!(err.to_string().contains("expected YYYY-MM-DD"));
    assert!(store.list_expenses().unwrap().is_empty());
}

#[test]
fn expense_add_trims_and_stores() {
    let mut store = Store::open_in_memory().unwrap();
    run(
        &mut store,
        &[
            "logbook", "expense", "add", "--item", "  Diesel ", "--amount", "9000.00", "--date",
            "2025-02-11", "--category", "Power",
        ],
        expenses::add,
    )
    .unwrap();
    let e = store.list_expenses().unwrap();
    assert_eq!(e[0].item, "Diesel");
    assert_eq!(e[0].category.as_deref(), Some("Power"));
    assert_eq!(e[0].amount, dec("9000"));
}

#[test]
fn product_with_negative_price_is_rejected() {
    let mut store = Store::open_in_memory().unwrap();
    let err = run(
        &mut store,
        &["logbook", "product", "add", "--name", "Soap", "--price", "-3"],
        products::add,
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("price must not be negative"));
    assert!(store.list_products().unwrap().is_empty());
}
