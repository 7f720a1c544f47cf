// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::db;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Draft, Expense, ExpenseDraft, Income, IncomeDraft, Product, ProductDraft, Record, RecordKind,
    SaleSource, ensure_positive,
};

/// Table-backed storage for products, income and expenses.
///
/// Owns its connection so callers hand it around explicitly; tests build one
/// over an in-memory database.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Store { conn }
    }

    pub fn open_in_memory() -> LedgerResult<Self> {
        Ok(Store::new(db::open_in_memory()?))
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Validates `draft` and writes it, returning the new row id. A rejected
    /// draft leaves every table untouched.
    pub fn insert(&mut self, draft: &Draft) -> LedgerResult<i64> {
        draft.validate().inspect_err(|e| {
            tracing::warn!(kind = %draft.kind(), error = %e, "rejected submission");
        })?;
        let id = match draft {
            Draft::Product(p) => self.insert_product(p)?,
            Draft::Income(i) => self.insert_income(i)?,
            Draft::Expense(e) => self.insert_expense(e)?,
        };
        tracing::info!(kind = %draft.kind(), id, "record stored");
        Ok(id)
    }

    fn insert_product(&mut self, p: &ProductDraft) -> LedgerResult<i64> {
        let name = p.name.trim();
        let tx = self.conn.transaction()?;
        let exists: Option<i64> = tx
            .query_row(
                "SELECT id FROM products WHERE name=?1",
                params![name],
                |r| r.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(LedgerError::invalid(
                RecordKind::Product,
                format!("product '{}' already exists", name),
            ));
        }
        tx.execute(
            "INSERT INTO products(name, price, category) VALUES (?1, ?2, ?3)",
            params![name, p.price.to_string(), clean(&p.category)],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    fn insert_income(&mut self, i: &IncomeDraft) -> LedgerResult<i64> {
        let tx = self.conn.transaction()?;
        let (product_id, quantity, amount) = match &i.source {
            SaleSource::Product {
                product_id,
                quantity,
            } => {
                let price: Option<String> = tx
                    .query_row(
                        "SELECT price FROM products WHERE id=?1",
                        params![product_id],
                        |r| r.get(0),
                    )
                    .optional()?;
                let price = price.ok_or_else(|| LedgerError::NotFound {
                    kind: RecordKind::Product,
                    key: product_id.to_string(),
                })?;
                let price = parse_stored_amount(RecordKind::Product, &price)?;
                let amount = price.checked_mul(Decimal::from(*quantity)).ok_or_else(|| {
                    LedgerError::invalid(RecordKind::Income, "sale total out of range")
                })?;
                ensure_positive(RecordKind::Income, amount)?;
                (Some(*product_id), *quantity, amount)
            }
            SaleSource::Amount(a) => (None, 1, *a),
        };
        tx.execute(
            "INSERT INTO income(date, product_id, quantity, amount, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                i.date.to_string(),
                product_id,
                quantity,
                amount.to_string(),
                clean(&i.description)
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    fn insert_expense(&mut self, e: &ExpenseDraft) -> LedgerResult<i64> {
        self.conn.execute(
            "INSERT INTO expenses(date, item, category, amount) VALUES (?1, ?2, ?3, ?4)",
            params![
                e.date.to_string(),
                e.item.trim(),
                clean(&e.category),
                e.amount.to_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_all(&self, kind: RecordKind) -> LedgerResult<Vec<Record>> {
        Ok(match kind {
            RecordKind::Product => self
                .list_products()?
                .into_iter()
                .map(Record::Product)
                .collect(),
            RecordKind::Income => self.list_income()?.into_iter().map(Record::Income).collect(),
            RecordKind::Expense => self
                .list_expenses()?
                .into_iter()
                .map(Record::Expense)
                .collect(),
        })
    }

    pub fn list_products(&self) -> LedgerResult<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, price, category FROM products ORDER BY id")?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, Option<String>>(3)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, name, price, category) = row?;
            out.push(Product {
                id,
                name,
                price: parse_stored_amount(RecordKind::Product, &price)?,
                category,
            });
        }
        Ok(out)
    }

    pub fn list_income(&self) -> LedgerResult<Vec<Income>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, amount, product_id, quantity, description
             FROM income ORDER BY date, id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, Option<i64>>(3)?,
                r.get::<_, i64>(4)?,
                r.get::<_, Option<String>>(5)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, date, amount, product_id, quantity, description) = row?;
            out.push(Income {
                id,
                date: parse_stored_date(RecordKind::Income, &date)?,
                amount: parse_stored_amount(RecordKind::Income, &amount)?,
                product_id,
                quantity,
                description,
            });
        }
        Ok(out)
    }

    pub fn list_expenses(&self) -> LedgerResult<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, amount, item, category FROM expenses ORDER BY date, id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, Option<String>>(4)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, date, amount, item, category) = row?;
            out.push(Expense {
                id,
                date: parse_stored_date(RecordKind::Expense, &date)?,
                amount: parse_stored_amount(RecordKind::Expense, &amount)?,
                item,
                category,
            });
        }
        Ok(out)
    }

    pub fn product_by_name(&self, name: &str) -> LedgerResult<Product> {
        let name = name.trim();
        let row: Option<(i64, String, String, Option<String>)> = self
            .conn
            .query_row(
                "SELECT id, name, price, category FROM products WHERE name=?1",
                params![name],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
            )
            .optional()?;
        let (id, name, price, category) = row.ok_or_else(|| LedgerError::NotFound {
            kind: RecordKind::Product,
            key: name.to_string(),
        })?;
        Ok(Product {
            id,
            name,
            price: parse_stored_amount(RecordKind::Product, &price)?,
            category,
        })
    }
}

fn clean(s: &Option<String>) -> Option<String> {
    s.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339, keeping the date.
pub fn parse_stored_date(kind: RecordKind, s: &str) -> LedgerResult<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    Err(LedgerError::invalid(
        kind,
        format!("unparseable timestamp '{}'", s),
    ))
}

pub fn parse_stored_amount(kind: RecordKind, s: &str) -> LedgerResult<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_| LedgerError::invalid(kind, format!("unparseable amount '{}'", s)))
}
