//! # Aggregation / Reporting
//!
//! Dashboard figures derived from the current stock and sales collections.
//!
//! ## Data Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  &[Unit] ──────┬──► stock_count, stock_value                            │
//! │                ├──► StockSummary       (count by brand / condition)     │
//! │                └──► StockValueSummary  (value by brand / condition)     │
//! │                                                                         │
//! │  &[SaleRecord] ┬──► sales_value, total_profit                           │
//! │                ├──► SalesValueSummary  (revenue by brand)               │
//! │                └──► ProfitSummary      (profit by brand, margin)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure and total. Nothing is maintained
//! incrementally: callers recompute from the collections they hold, which
//! may have been read at slightly different instants. Empty input yields
//! zeros, and every ratio with a zero denominator yields 0.

use serde::Serialize;
use std::ops::Add;

use crate::money::Money;
use crate::types::{Condition, SaleRecord, Unit};

// =============================================================================
// Breakdown
// =============================================================================

/// One row of a "by brand" or "by condition" table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown<V> {
    pub label: String,
    pub value: V,
}

/// Folds `items` into labelled totals, sorted by value descending.
///
/// Rows keep the order in which their label first appeared (after any
/// `seed` labels) when values tie.
fn breakdown<T, V, L, F>(items: &[T], seed: &[&str], label: L, value: F) -> Vec<Breakdown<V>>
where
    V: Copy + Default + Ord + Add<Output = V>,
    L: Fn(&T) -> &str,
    F: Fn(&T) -> V,
{
    let mut rows: Vec<Breakdown<V>> = seed
        .iter()
        .map(|s| Breakdown {
            label: (*s).to_string(),
            value: V::default(),
        })
        .collect();

    for item in items {
        let l = label(item);
        let v = value(item);
        match rows.iter_mut().find(|r| r.label == l) {
            Some(row) => row.value = row.value + v,
            None => rows.push(Breakdown {
                label: l.to_string(),
                value: v,
            }),
        }
    }

    // sort_by is stable, so first-occurrence order survives ties
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    rows
}

fn condition_seed() -> [&'static str; 2] {
    [Condition::New.as_str(), Condition::Used.as_str()]
}

fn units_sold(sales: &[SaleRecord]) -> u64 {
    sales.iter().map(|s| u64::from(s.quantity_sold)).sum()
}

// =============================================================================
// Dashboard Headline
// =============================================================================

/// The four headline numbers on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardStats {
    pub stock_count: u64,
    /// Σ buying_cost over stock.
    pub stock_value: Money,
    /// Σ final price × quantity over sales.
    pub sales_value: Money,
    /// Σ total_profit over sales.
    pub total_profit: Money,
}

pub fn dashboard_stats(stock: &[Unit], sales: &[SaleRecord]) -> DashboardStats {
    DashboardStats {
        stock_count: stock.len() as u64,
        stock_value: stock.iter().map(|u| u.buying_cost).sum(),
        sales_value: sales.iter().map(SaleRecord::sales_value).sum(),
        total_profit: sales.iter().map(|s| s.total_profit).sum(),
    }
}

// =============================================================================
// Stock Summaries
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockSummary {
    pub total_units: u64,
    pub by_brand: Vec<Breakdown<u64>>,
    /// Always lists both conditions.
    pub by_condition: Vec<Breakdown<u64>>,
}

pub fn stock_summary(stock: &[Unit]) -> StockSummary {
    StockSummary {
        total_units: stock.len() as u64,
        by_brand: breakdown(stock, &[], |u| u.spec.brand.as_str(), |_| 1u64),
        by_condition: breakdown(stock, &condition_seed(), |u| u.spec.condition.as_str(), |_| 1u64),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockValueSummary {
    pub total_units: u64,
    pub total_value: Money,
    /// total_value / total_units, or zero for empty stock.
    pub average_buying_cost: Money,
    pub by_brand: Vec<Breakdown<Money>>,
    pub by_condition: Vec<Breakdown<Money>>,
}

pub fn stock_value_summary(stock: &[Unit]) -> StockValueSummary {
    let total_value: Money = stock.iter().map(|u| u.buying_cost).sum();
    let total_units = stock.len() as u64;

    StockValueSummary {
        total_units,
        total_value,
        average_buying_cost: total_value.average_over(total_units),
        by_brand: breakdown(stock, &[], |u| u.spec.brand.as_str(), |u| u.buying_cost),
        by_condition: breakdown(
            stock,
            &condition_seed(),
            |u| u.spec.condition.as_str(),
            |u| u.buying_cost,
        ),
    }
}

// =============================================================================
// Sales Summaries
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesValueSummary {
    pub total_sales_value: Money,
    pub transactions: u64,
    pub units_sold: u64,
    /// Per unit, not per transaction.
    pub average_selling_price: Money,
    pub by_brand: Vec<Breakdown<Money>>,
}

pub fn sales_value_summary(sales: &[SaleRecord]) -> SalesValueSummary {
    let total_sales_value: Money = sales.iter().map(SaleRecord::sales_value).sum();
    let units = units_sold(sales);

    SalesValueSummary {
        total_sales_value,
        transactions: sales.len() as u64,
        units_sold: units,
        average_selling_price: total_sales_value.average_over(units),
        by_brand: breakdown(sales, &[], |s| s.spec.brand.as_str(), SaleRecord::sales_value),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitSummary {
    pub total_profit: Money,
    pub transactions: u64,
    pub units_sold: u64,
    pub profitable_sales: u64,
    pub loss_sales: u64,
    pub average_profit_per_unit: Money,
    /// total_profit / Σ(buying × quantity) × 100.
    pub overall_margin_pct: f64,
    pub by_brand: Vec<Breakdown<Money>>,
}

/// Profit figures. Break-even sales count as neither profitable nor loss.
pub fn profit_summary(sales: &[SaleRecord]) -> ProfitSummary {
    let total_profit: Money = sales.iter().map(|s| s.total_profit).sum();
    let cost_basis: Money = sales.iter().map(SaleRecord::cost_basis).sum();
    let units = units_sold(sales);

    ProfitSummary {
        total_profit,
        transactions: sales.len() as u64,
        units_sold: units,
        profitable_sales: sales.iter().filter(|s| s.total_profit.is_positive()).count() as u64,
        loss_sales: sales.iter().filter(|s| s.total_profit.is_negative()).count() as u64,
        average_profit_per_unit: total_profit.average_over(units),
        overall_margin_pct: total_profit.percent_of(cost_basis),
        by_brand: breakdown(sales, &[], |s| s.spec.brand.as_str(), |s| s.total_profit),
    }
}

// =============================================================================
// Recent Activity
// =============================================================================

/// The `limit` most recent sales, newest first.
pub fn recent_sales(sales: &[SaleRecord], limit: usize) -> Vec<&SaleRecord> {
    let mut ordered: Vec<&SaleRecord> = sales.iter().collect();
    ordered.sort_by(|a, b| b.date_sold.cmp(&a.date_sold));
    ordered.truncate(limit);
    ordered
}

/// The `limit` most recently added units, newest first.
pub fn recent_stock(stock: &[Unit], limit: usize) -> Vec<&Unit> {
    let mut ordered: Vec<&Unit> = stock.iter().collect();
    ordered.sort_by(|a, b| b.age_key().cmp(&a.age_key()));
    ordered.truncate(limit);
    ordered
}

// =============================================================================
// Unit Tests
// =============================================================================
