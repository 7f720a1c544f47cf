// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use logbook::error::LedgerError;
use logbook::ledger::{Granularity, LedgerAggregator};
use logbook::models::{
    Draft, ExpenseDraft, IncomeDraft, ProductDraft, Record, RecordKind, SaleSource,
};
use logbook::store::Store;
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn product(name: &str, price: &str) -> Draft {
    Draft::Product(ProductDraft {
        name: name.into(),
        price: dec(price),
        category: None,
    })
}

fn sale_amount(date: &str, amount: &str) -> Draft {
    Draft::Income(IncomeDraft {
        date: d(date),
        source: SaleSource::Amount(dec(amount)),
        description: None,
    })
}

fn expense(date: &str, item: &str, amount: &str) -> Draft {
    Draft::Expense(ExpenseDraft {
        date: d(date),
        amount: dec(amount),
        item: item.into(),
        category: Some("  ".into()),
    })
}

fn count(store: &Store, table: &str) -> i64 {
    store
        .conn()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn records_round_trip_with_exact_decimals() {
    let mut store = Store::open_in_memory().unwrap();
    store.insert(&product(" Bread ", "1200.50")).unwrap();
    store.insert(&sale_amount("2025-04-02", "0.10")).unwrap();
    store.insert(&expense("2025-04-01", "Flour", "333.333")).unwrap();

    let products = store.list_products().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Bread");
    assert_eq!(products[0].price, dec("1200.50"));

    let income = store.list_income().unwrap();
    assert_eq!(income[0].amount, dec("0.10"));
    assert_eq!(income[0].quantity, 1);
    assert_eq!(income[0].product_id, None);

    let expenses = store.list_expenses().unwrap();
    assert_eq!(expenses[0].amount, dec("333.333"));
    // Blank optional text is stored as NULL.
    assert_eq!(expenses[0].category, None);
}

#[test]
fn product_sale_stores_quantity_times_price() {
    let mut store = Store::open_in_memory().unwrap();
    let pid = store.insert(&product("Cake", "2500.25")).unwrap();
    store
        .insert(&Draft::Income(IncomeDraft {
            date: d("2025-04-03"),
            source: SaleSource::Product {
                product_id: pid,
                quantity: 3,
            },
            description: Some("Birthday order".into()),
        }))
        .unwrap();

    let income = store.list_income().unwrap();
    assert_eq!(income[0].amount, dec("7500.75"));
    assert_eq!(income[0].product_id, Some(pid));
    assert_eq!(income[0].quantity, 3);
    assert_eq!(income[0].description.as_deref(), Some("Birthday order"));
}

#[test]
fn invalid_drafts_leave_tables_untouched() {
    let mut store = Store::open_in_memory().unwrap();
    let pid = store.insert(&product("Free sample", "0")).unwrap();

    let rejected = [
        product("", "10"),
        product("Gadget", "-1"),
        sale_amount("2025-01-01", "-10"),
        sale_amount("2025-01-01", "0"),
        expense("2025-01-01", "   ", "5"),
        expense("2025-01-01", "Rent", "-5"),
        // A zero-priced product cannot produce a positive sale.
        Draft::Income(IncomeDraft {
            date: d("2025-01-01"),
            source: SaleSource::Product {
                product_id: pid,
                quantity: 2,
            },
            description: None,
        }),
        Draft::Income(IncomeDraft {
            date: d("2025-01-01"),
            source: SaleSource::Product {
                product_id: pid,
                quantity: 0,
            },
            description: None,
        }),
    ];
    for draft in &rejected {
        let err = store.insert(draft).unwrap_err();
        assert!(err.is_invalid_record(), "{:?} gave {}", draft, err);
    }
    assert_eq!(count(&store, "products"), 1);
    assert_eq!(count(&store, "income"), 0);
    assert_eq!(count(&store, "expenses"), 0);
}

#[test]
fn duplicate_product_name_is_rejected() {
    let mut store = Store::open_in_memory().unwrap();
    store.insert(&product("Tea", "300")).unwrap();
    let err = store.insert(&product("Tea ", "350")).unwrap_err();
    assert!(err.is_invalid_record());
    assert_eq!(count(&store, "products"), 1);
}

#[test]
fn sale_of_unknown_product_is_not_found() {
    let mut store = Store::open_in_memory().unwrap();
    let err = store
        .insert(&Draft::Income(IncomeDraft {
            date: d("2025-01-01"),
            source: SaleSource::Product {
                product_id: 99,
                quantity: 1,
            },
            description: None,
        }))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::NotFound {
            kind: RecordKind::Product,
            ..
        }
    ));
    assert!(store.product_by_name("Nope").is_err());
}

#[test]
fn list_all_returns_tagged_records_in_date_order() {
    let mut store = Store::open_in_memory().unwrap();
    store.insert(&sale_amount("2025-02-10", "5")).unwrap();
    store.insert(&sale_amount("2025-02-01", "7")).unwrap();
    store.insert(&expense("2025-02-05", "Fuel", "2")).unwrap();

    let income = store.list_all(RecordKind::Income).unwrap();
    assert_eq!(income.len(), 2);
    assert!(income.iter().all(|r| r.kind() == RecordKind::Income));
    match &income[0] {
        Record::Income(i) => assert_eq!(i.date, d("2025-02-01")),
        other => panic!("unexpected record {:?}", other),
    }
    assert_eq!(store.list_all(RecordKind::Expense).unwrap().len(), 1);
    assert!(store.list_all(RecordKind::Product).unwrap().is_empty());
}

#[test]
fn stored_datetime_text_is_read_as_date() {
    let store = Store::open_in_memory().unwrap();
    store
        .conn()
        .execute(
            "INSERT INTO expenses(date, item, amount) VALUES ('2025-03-04 17:45:00', 'Taxi', '12')",
            [],
        )
        .unwrap();
    let e = store.list_expenses().unwrap();
    assert_eq!(e[0].date, d("2025-03-04"));
}

#[test]
fn unparseable_stored_date_is_invalid_record() {
    let store = Store::open_in_memory().unwrap();
    store
        .conn()
        .execute(
            "INSERT INTO income(date, quantity, amount) VALUES ('03/04/2025', 1, '10')",
            [],
        )
        .unwrap();
    let err = store.list_income().unwrap_err();
    assert!(err.is_invalid_record());
    assert!(err.to_string().contains("unparseable timestamp"));
}

#[test]
fn negative_stored_amount_fails_aggregation() {
    let store = Store::open_in_memory().unwrap();
    store
        .conn()
        .execute(
            "INSERT INTO income(date, quantity, amount) VALUES ('2025-03-04', 1, '-10')",
            [],
        )
        .unwrap();
    let err = LedgerAggregator::default()
        .report_from_store(&store)
        .unwrap_err();
    assert!(err.is_invalid_record());
}

#[test]
fn report_from_store_aggregates_everything() {
    let mut store = Store::open_in_memory().unwrap();
    store.insert(&sale_amount("2025-01-01", "100")).unwrap();
    store.insert(&expense("2025-01-02", "Rent", "30")).unwrap();
    store.insert(&sale_amount("2025-01-03", "50")).unwrap();

    let report = LedgerAggregator::new(Granularity::Day)
        .report_from_store(&store)
        .unwrap();
    assert_eq!(report.snapshot.net_profit, dec("120"));
    assert_eq!(report.trend.points().len(), 3);
    assert_eq!(report.trend.closing_balance(), report.snapshot.net_profit);
}
