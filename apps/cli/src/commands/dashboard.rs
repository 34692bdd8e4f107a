//! # Dashboard Command
//!
//! Headline figures, recent activity and, with `--detail`, one of the four
//! summary breakdowns.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Units in stock   Stock value     Sales value     Total profit          │
//! │  12               ₹384000.00      ₹151000.00      ₹17500.00             │
//! │                                                                         │
//! │  --detail stock        count by brand / condition                       │
//! │  --detail stock-value  value by brand / condition, average cost         │
//! │  --detail sales-value  sales by brand, average selling price            │
//! │  --detail profit       profit by brand, margin, profitable vs loss      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is computed from one snapshot of stock and sales; nothing here
//! can fail once the snapshot is loaded.

use clap::{Args, ValueEnum};
use laptrack_core::{
    profit_summary, recent_sales, recent_stock, sales_value_summary, stock_summary,
    stock_value_summary, Breakdown, DashboardStats, InventorySnapshot, Money, ProfitSummary,
    SaleRecord, SalesValueSummary, StockSummary, StockValueSummary, Unit,
};
use laptrack_db::Database;
use serde::Serialize;
use std::fmt::Write;

use super::{pad, Render};
use crate::error::ApiError;
use crate::state::{ConfigState, MAX_RECENT_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Detail {
    Stock,
    StockValue,
    SalesValue,
    Profit,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Add a summary breakdown
    #[arg(long, value_enum)]
    pub detail: Option<Detail>,

    /// Number of recent sales / additions to list (default from config)
    #[arg(long, value_parser = parse_recent_limit)]
    pub recent: Option<usize>,
}

/// Same bounds as the `recent_limit` config key.
fn parse_recent_limit(raw: &str) -> Result<usize, String> {
    let limit: usize = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if !(1..=MAX_RECENT_LIMIT).contains(&limit) {
        return Err(format!("must be between 1 and {}", MAX_RECENT_LIMIT));
    }
    Ok(limit)
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DetailReport {
    Stock(StockSummary),
    StockValue(StockValueSummary),
    SalesValue(SalesValueSummary),
    Profit(ProfitSummary),
}

impl DetailReport {
    pub fn build(detail: Detail, snapshot: &InventorySnapshot) -> Self {
        match detail {
            Detail::Stock => DetailReport::Stock(stock_summary(snapshot.stock())),
            Detail::StockValue => DetailReport::StockValue(stock_value_summary(snapshot.stock())),
            Detail::SalesValue => DetailReport::SalesValue(sales_value_summary(snapshot.sales())),
            Detail::Profit => DetailReport::Profit(profit_summary(snapshot.sales())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub recent_sales: Vec<SaleRecord>,
    pub recent_stock: Vec<Unit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<DetailReport>,
}

/// Builds the dashboard from a fresh snapshot.
pub async fn dashboard(
    db: &Database,
    detail: Option<Detail>,
    recent_limit: usize,
) -> Result<DashboardView, ApiError> {
    let snapshot = db.load_snapshot().await?;
    Ok(build_view(&snapshot, detail, recent_limit))
}

pub fn build_view(
    snapshot: &InventorySnapshot,
    detail: Option<Detail>,
    recent_limit: usize,
) -> DashboardView {
    DashboardView {
        stats: snapshot.dashboard(),
        recent_sales: recent_sales(snapshot.sales(), recent_limit)
            .into_iter()
            .cloned()
            .collect(),
        recent_stock: recent_stock(snapshot.stock(), recent_limit)
            .into_iter()
            .cloned()
            .collect(),
        detail: detail.map(|d| DetailReport::build(d, snapshot)),
    }
}

// =============================================================================
// Text Rendering
// =============================================================================

impl Render for DashboardView {
    fn render_text(&self, config: &ConfigState) -> String {
        let money = |m: Money| config.format_currency(m);
        let mut out = String::new();

        let _ = writeln!(out, "Units in stock: {}", self.stats.stock_count);
        let _ = writeln!(out, "Stock value:    {}", money(self.stats.stock_value));
        let _ = writeln!(out, "Sales value:    {}", money(self.stats.sales_value));
        let _ = writeln!(out, "Total profit:   {}", money(self.stats.total_profit));

        out.push_str("\nRecent sales\n");
        if self.recent_sales.is_empty() {
            out.push_str("  none\n");
        }
        for sale in &self.recent_sales {
            let _ = writeln!(
                out,
                "  {} {} x{} profit {}",
                sale.date_sold.format("%Y-%m-%d"),
                pad(&sale.spec.title(), 28),
                sale.quantity_sold,
                money(sale.total_profit)
            );
        }

        out.push_str("\nRecently added\n");
        if self.recent_stock.is_empty() {
            out.push_str("  none\n");
        }
        for unit in &self.recent_stock {
            let _ = writeln!(
                out,
                "  {} {} {}",
                unit.date_added.format("%Y-%m-%d"),
                pad(&unit.spec.title(), 28),
                money(unit.buying_cost)
            );
        }

        if let Some(detail) = &self.detail {
            out.push('\n');
            out.push_str(&render_detail(detail, config));
        }
        out
    }
}

fn render_detail(detail: &DetailReport, config: &ConfigState) -> String {
    let money = |m: Money| config.format_currency(m);
    let mut out = String::new();

    match detail {
        DetailReport::Stock(s) => {
            let _ = writeln!(out, "Stock: {} units", s.total_units);
            table(&mut out, "By brand", &s.by_brand, |v| v.to_string());
            table(&mut out, "By condition", &s.by_condition, |v| v.to_string());
        }
        DetailReport::StockValue(s) => {
            let _ = writeln!(out, "Stock value: {} over {} units", money(s.total_value), s.total_units);
            let _ = writeln!(out, "Average buying cost: {}", money(s.average_buying_cost));
            table(&mut out, "By brand", &s.by_brand, |v| money(*v));
            table(&mut out, "By condition", &s.by_condition, |v| money(*v));
        }
        DetailReport::SalesValue(s) => {
            let _ = writeln!(
                out,
                "Sales value: {} from {} transactions, {} units",
                money(s.total_sales_value),
                s.transactions,
                s.units_sold
            );
            let _ = writeln!(out, "Average selling price: {}", money(s.average_selling_price));
            table(&mut out, "By brand", &s.by_brand, |v| money(*v));
        }
        DetailReport::Profit(s) => {
            let _ = writeln!(
                out,
                "Total profit: {} from {} transactions, {} units",
                money(s.total_profit),
                s.transactions,
                s.units_sold
            );
            let _ = writeln!(
                out,
                "Profitable sales: {}  Loss-making sales: {}",
                s.profitable_sales, s.loss_sales
            );
            let _ = writeln!(out, "Average profit per unit: {}", money(s.average_profit_per_unit));
            let _ = writeln!(out, "Overall margin: {:.2}%", s.overall_margin_pct);
            table(&mut out, "By brand", &s.by_brand, |v| money(*v));
        }
    }
    out
}

fn table<V>(out: &mut String, title: &str, rows: &[Breakdown<V>], fmt: impl Fn(&V) -> String) {
    let _ = writeln!(out, "{}", title);
    if rows.is_empty() {
        out.push_str("  none\n");
    }
    for row in rows {
        let _ = writeln!(out, "  {} {}", pad(&row.label, 16), fmt(&row.value));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::sale::sell;
    use crate::commands::stock::add;
    use crate::commands::test_support::{at, draft, memory_db};
    use laptrack_core::GroupSelector;

    #[tokio::test]
    async fn test_empty_dashboard_is_all_zero() {
        let db = memory_db().await;
        let view = dashboard(&db, Some(Detail::Profit), 5).await.unwrap();

        assert_eq!(view.stats, DashboardStats::default());
        assert!(view.recent_sales.is_empty());
        match view.detail {
            Some(DetailReport::Profit(p)) => {
                assert_eq!(p.overall_margin_pct, 0.0);
                assert_eq!(p.average_profit_per_unit, Money::zero());
            }
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dashboard_after_add_and_sell() {
        let db = memory_db().await;
        add(&db, draft("Dell", "Latitude 7420", 30_000), 2, at(0))
            .await
            .unwrap();
        add(&db, draft("HP", "EliteBook 840", 20_000), 1, at(10))
            .await
            .unwrap();
        sell(
            &db,
            &GroupSelector::Position(1),
            1,
            Some(Money::from_major_minor(36_000, 0)),
            at(20),
        )
        .await
        .unwrap();

        let view = dashboard(&db, Some(Detail::StockValue), 1).await.unwrap();
        assert_eq!(view.stats.stock_count, 2);
        assert_eq!(view.stats.stock_value, Money::from_major_minor(50_000, 0));
        assert_eq!(view.stats.sales_value, Money::from_major_minor(36_000, 0));
        assert_eq!(view.stats.total_profit, Money::from_major_minor(6_000, 0));

        assert_eq!(view.recent_sales.len(), 1);
        assert_eq!(view.recent_stock.len(), 1);
        assert_eq!(view.recent_stock[0].spec.brand, "HP");

        match &view.detail {
            Some(DetailReport::StockValue(s)) => {
                assert_eq!(s.average_buying_cost, Money::from_major_minor(25_000, 0));
                assert_eq!(s.by_brand[0].value, Money::from_major_minor(30_000, 0));
            }
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn test_recent_limit_bounds() {
        assert_eq!(parse_recent_limit("1"), Ok(1));
        assert_eq!(parse_recent_limit("100"), Ok(MAX_RECENT_LIMIT));
        assert!(parse_recent_limit("0").is_err());
        assert!(parse_recent_limit("101").is_err());
        assert!(parse_recent_limit("-2").is_err());
        assert!(parse_recent_limit("few").is_err());
    }

    #[test]
    fn test_json_detail_tag() {
        let view = build_view(&InventorySnapshot::default(), Some(Detail::SalesValue), 5);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["detail"]["kind"], "sales-value");
        assert_eq!(json["stats"]["stock_count"], 0);

        let plain = build_view(&InventorySnapshot::default(), None, 5);
        assert!(serde_json::to_value(&plain).unwrap().get("detail").is_none());
    }

    #[test]
    fn test_text_lists_both_conditions() {
        let view = build_view(&InventorySnapshot::default(), Some(Detail::Stock), 5);
        let text = view.render_text(&ConfigState::default());
        assert!(text.contains("Total profit:   ₹0.00"));
        assert!(text.contains("New"));
        assert!(text.contains("Used"));
    }
}
