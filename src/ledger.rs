// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! KPI snapshot and cashflow trend computation.
//!
//! Everything here is a pure function of the records handed in. Monetary sums
//! use `Decimal` at full precision; rounding happens only when values are
//! rendered or exported.

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, Income, RecordKind};
use crate::store::Store;

/// Width of a trend bucket. Buckets are aligned to calendar boundaries:
/// midnight for days, Monday for weeks, the 1st for months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

#[derive(Debug, Error)]
#[error("Invalid granularity '{0}', expected day|week|month")]
pub struct ParseGranularityError(String);

impl FromStr for Granularity {
    type Err = ParseGranularityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            _ => Err(ParseGranularityError(s.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        };
        f.write_str(s)
    }
}

impl Granularity {
    /// Start of the bucket containing `date`.
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                let back = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(back)).unwrap_or(date)
            }
            Granularity::Month => {
                NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
            }
        }
    }

    /// Start of the bucket after the one starting at `start`, or `None` past
    /// the end of the calendar.
    pub fn next_start(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Day => start.succ_opt(),
            Granularity::Week => start.checked_add_days(Days::new(7)),
            Granularity::Month => start.checked_add_months(Months::new(1)),
        }
    }
}

/// One trend bucket, identified by its start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub granularity: Granularity,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.granularity {
            Granularity::Day => write!(f, "{}", self.start.format("%Y-%m-%d")),
            Granularity::Week => write!(f, "{}", self.start.format("%G-W%V")),
            Granularity::Month => write!(f, "{}", self.start.format("%Y-%m")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    pub income_count: usize,
    pub expense_count: usize,
    /// Latest record date seen; `None` for an empty ledger.
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub period: Period,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net_amount: Decimal,
    pub running_balance: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct BucketTotals {
    income: Decimal,
    expenses: Decimal,
}

/// Bucketed cashflow. Only occupied buckets are stored; the gaps between them
/// are filled in while iterating, so the sequence never skips a period.
#[derive(Debug, Clone, PartialEq)]
pub struct CashflowTrend {
    granularity: Granularity,
    buckets: BTreeMap<NaiveDate, BucketTotals>,
}

impl CashflowTrend {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn first_period(&self) -> Option<Period> {
        self.buckets.keys().next().map(|&start| Period {
            start,
            granularity: self.granularity,
        })
    }

    /// Walks the trend from the first bucket. Each call starts over.
    pub fn iter(&self) -> TrendIter<'_> {
        TrendIter {
            trend: self,
            cursor: self.buckets.keys().next().copied(),
            last: self.buckets.keys().next_back().copied(),
            balance: Decimal::ZERO,
        }
    }

    pub fn points(&self) -> Vec<TrendPoint> {
        self.iter().collect()
    }

    /// Running balance per period, for the stock-like chart. Same points as
    /// `iter`, relabelled.
    pub fn balance_series(&self) -> impl Iterator<Item = (Period, Decimal)> + '_ {
        self.iter().map(|p| (p.period, p.running_balance))
    }

    /// Balance after the last period; zero for an empty trend.
    pub fn closing_balance(&self) -> Decimal {
        self.balance_series()
            .last()
            .map(|(_, b)| b)
            .unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a CashflowTrend {
    type Item = TrendPoint;
    type IntoIter = TrendIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct TrendIter<'a> {
    trend: &'a CashflowTrend,
    cursor: Option<NaiveDate>,
    last: Option<NaiveDate>,
    balance: Decimal,
}

impl Iterator for TrendIter<'_> {
    type Item = TrendPoint;

    fn next(&mut self) -> Option<TrendPoint> {
        let start = self.cursor?;
        if start > self.last? {
            self.cursor = None;
            return None;
        }
        let granularity = self.trend.granularity;
        let totals = self
            .trend
            .buckets
            .get(&start)
            .copied()
            .unwrap_or_default();
        let net_amount = totals.income - totals.expenses;
        self.balance += net_amount;
        self.cursor = granularity.next_start(start);
        Some(TrendPoint {
            period: Period { start, granularity },
            income: totals.income,
            expenses: totals.expenses,
            net_amount,
            running_balance: self.balance,
        })
    }
}

fn checked_amount(kind: RecordKind, id: i64, amount: Decimal) -> LedgerResult<Decimal> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::invalid(
            kind,
            format!("amount must not be negative, got {} (id {})", amount, id),
        ));
    }
    Ok(amount)
}

fn add(kind: RecordKind, acc: Decimal, amount: Decimal) -> LedgerResult<Decimal> {
    acc.checked_add(amount)
        .ok_or_else(|| LedgerError::invalid(kind, "total exceeds representable range"))
}

pub fn compute_snapshot(income: &[Income], expenses: &[Expense]) -> LedgerResult<KpiSnapshot> {
    let mut total_revenue = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut as_of: Option<NaiveDate> = None;

    for i in income {
        let amount = checked_amount(RecordKind::Income, i.id, i.amount)?;
        total_revenue = add(RecordKind::Income, total_revenue, amount)?;
        as_of = as_of.max(Some(i.date));
    }
    for e in expenses {
        let amount = checked_amount(RecordKind::Expense, e.id, e.amount)?;
        total_expenses = add(RecordKind::Expense, total_expenses, amount)?;
        as_of = as_of.max(Some(e.date));
    }

    let net_profit = total_revenue
        .checked_sub(total_expenses)
        .ok_or_else(|| LedgerError::invalid(RecordKind::Expense, "profit out of range"))?;

    tracing::debug!(
        income = income.len(),
        expenses = expenses.len(),
        %net_profit,
        "computed snapshot"
    );
    Ok(KpiSnapshot {
        total_revenue,
        total_expenses,
        net_profit,
        income_count: income.len(),
        expense_count: expenses.len(),
        as_of,
    })
}

pub fn compute_trend(
    income: &[Income],
    expenses: &[Expense],
    granularity: Granularity,
) -> LedgerResult<CashflowTrend> {
    let mut buckets: BTreeMap<NaiveDate, BucketTotals> = BTreeMap::new();

    for i in income {
        let amount = checked_amount(RecordKind::Income, i.id, i.amount)?;
        let b = buckets.entry(granularity.bucket_start(i.date)).or_default();
        b.income = add(RecordKind::Income, b.income, amount)?;
    }
    for e in expenses {
        let amount = checked_amount(RecordKind::Expense, e.id, e.amount)?;
        let b = buckets.entry(granularity.bucket_start(e.date)).or_default();
        b.expenses = add(RecordKind::Expense, b.expenses, amount)?;
    }

    // Empty buckets add zero, so the occupied ones bound the running balance.
    let mut balance = Decimal::ZERO;
    for (start, b) in &buckets {
        balance = balance
            .checked_add(b.income - b.expenses)
            .ok_or_else(|| {
                LedgerError::invalid(
                    RecordKind::Income,
                    format!("running balance out of range at {}", start),
                )
            })?;
    }

    tracing::debug!(%granularity, occupied = buckets.len(), "computed trend");
    Ok(CashflowTrend {
        granularity,
        buckets,
    })
}

/// Snapshot and trend computed from the same records. The dashboard and the
/// export both consume this, so their figures always agree.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerReport {
    pub snapshot: KpiSnapshot,
    pub trend: CashflowTrend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerAggregator {
    granularity: Granularity,
}

impl LedgerAggregator {
    pub fn new(granularity: Granularity) -> Self {
        LedgerAggregator { granularity }
    }

    pub fn snapshot(&self, income: &[Income], expenses: &[Expense]) -> LedgerResult<KpiSnapshot> {
        compute_snapshot(income, expenses)
    }

    pub fn trend(&self, income: &[Income], expenses: &[Expense]) -> LedgerResult<CashflowTrend> {
        compute_trend(income, expenses, self.granularity)
    }

    pub fn report(&self, income: &[Income], expenses: &[Expense]) -> LedgerResult<LedgerReport> {
        Ok(LedgerReport {
            snapshot: self.snapshot(income, expenses)?,
            trend: self.trend(income, expenses)?,
        })
    }

    pub fn report_from_store(&self, store: &Store) -> LedgerResult<LedgerReport> {
        let income = store.list_income()?;
        let expenses = store.list_expenses()?;
        self.report(&income, &expenses)
    }
}
