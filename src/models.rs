// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Product,
    Income,
    Expense,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordKind::Product => "product",
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub category: Option<String>,
}

/// A sale. `amount` is the stored total; for product sales it was resolved
/// as `quantity * price` when the sale was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub product_id: Option<i64>,
    pub quantity: i64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub item: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Product(Product),
    Income(Income),
    Expense(Expense),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Product(_) => RecordKind::Product,
            Record::Income(_) => RecordKind::Income,
            Record::Expense(_) => RecordKind::Expense,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    pub category: Option<String>,
}

/// How a sale gets its amount: looked up from a product, or given directly.
#[derive(Debug, Clone, PartialEq)]
pub enum SaleSource {
    Product { product_id: i64, quantity: i64 },
    Amount(Decimal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomeDraft {
    pub date: NaiveDate,
    pub source: SaleSource,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub item: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    Product(ProductDraft),
    Income(IncomeDraft),
    Expense(ExpenseDraft),
}

impl Draft {
    pub fn kind(&self) -> RecordKind {
        match self {
            Draft::Product(_) => RecordKind::Product,
            Draft::Income(_) => RecordKind::Income,
            Draft::Expense(_) => RecordKind::Expense,
        }
    }

    /// Checks field-level invariants. Product-backed sales are checked again
    /// once the price is known, since a zero price yields a zero amount.
    pub fn validate(&self) -> LedgerResult<()> {
        let kind = self.kind();
        match self {
            Draft::Product(p) => {
                if p.name.trim().is_empty() {
                    return Err(LedgerError::invalid(kind, "name must not be empty"));
                }
                if p.price < Decimal::ZERO {
                    return Err(LedgerError::invalid(
                        kind,
                        format!("price must not be negative, got {}", p.price),
                    ));
                }
            }
            Draft::Income(i) => match &i.source {
                SaleSource::Product { quantity, .. } => {
                    if *quantity < 1 {
                        return Err(LedgerError::invalid(
                            kind,
                            format!("quantity must be at least 1, got {}", quantity),
                        ));
                    }
                }
                SaleSource::Amount(a) => ensure_positive(kind, *a)?,
            },
            Draft::Expense(e) => {
                if e.item.trim().is_empty() {
                    return Err(LedgerError::invalid(kind, "item must not be empty"));
                }
                ensure_positive(kind, e.amount)?;
            }
        }
        Ok(())
    }
}

pub fn ensure_positive(kind: RecordKind, amount: Decimal) -> LedgerResult<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid(
            kind,
            format!("amount must be greater than zero, got {}", amount),
        ));
    }
    Ok(())
}
