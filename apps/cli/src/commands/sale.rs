//! # Sale Commands
//!
//! `sell` settles a sale against one inventory group; `sales` lists the
//! sale history.
//!
//! ## Sell Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sell #2 --quantity 2 --price 52000                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stock().list() ──► group_units() ──► find_group(#2)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  settle(group, 2, ₹52000.00, now)   ← ValidationError stops here        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sales().commit_sale(&settlement)   ← Consistency error rolls back      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleView { record, removed ids, remaining quantity }                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use clap::Args;
use laptrack_core::{
    default_sale_price, find_group, group_units, settle, GroupSelector, Money, SaleRecord,
};
use laptrack_db::Database;
use serde::Serialize;
use std::fmt::Write;
use tracing::info;

use super::{pad, plural, Render};
use crate::error::ApiError;
use crate::state::ConfigState;

// =============================================================================
// sell
// =============================================================================

#[derive(Debug, Args)]
pub struct SellArgs {
    /// Inventory position (3 or #3) or the id of any unit in the group
    pub group: GroupSelector,

    #[arg(long, short = 'q', default_value_t = 1)]
    pub quantity: u32,

    /// Price per unit; defaults to the group's target price, else its cost
    #[arg(long, value_name = "AMOUNT")]
    pub price: Option<Money>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleView {
    pub record: SaleRecord,
    /// Units retired by this sale, oldest first.
    pub removed_unit_ids: Vec<String>,
    /// Units left in the group afterwards.
    pub remaining_in_group: u32,
}

impl Render for SaleView {
    fn render_text(&self, config: &ConfigState) -> String {
        let r = &self.record;
        let mut out = format!(
            "Sold {} of {} at {} each\n",
            plural(u64::from(r.quantity_sold), "unit"),
            r.spec.title(),
            config.format_currency(r.final_selling_price_per_unit),
        );
        let _ = writeln!(
            out,
            "  Profit: {} (cost {} per unit)",
            config.format_currency(r.total_profit),
            config.format_currency(r.buying_cost_per_unit),
        );
        let _ = writeln!(out, "  Sale id: {}", r.sale_id);
        let _ = writeln!(out, "  Left in group: {}", self.remaining_in_group);
        out
    }
}

/// Sells `quantity` units from the selected group, oldest first.
///
/// Nothing is written unless the quantity fits the group and the price is
/// positive. If another sale took some of the units in the meantime the
/// store rejects the whole sale.
pub async fn sell(
    db: &Database,
    selector: &GroupSelector,
    quantity: u32,
    price: Option<Money>,
    now: DateTime<Utc>,
) -> Result<SaleView, ApiError> {
    let stock = db.stock().list().await?;
    let groups = group_units(&stock);
    let group = find_group(&groups, selector)?;

    let unit_price = price.unwrap_or_else(|| default_sale_price(group));
    let settlement = settle(group, quantity, unit_price, now)?;
    let record = db.sales().commit_sale(&settlement).await?;

    info!(
        sale_id = %record.sale_id,
        group = %selector,
        quantity,
        "Sale recorded"
    );

    Ok(SaleView {
        record,
        remaining_in_group: group.quantity() - settlement.quantity(),
        removed_unit_ids: settlement.removed_unit_ids,
    })
}

// =============================================================================
// sales
// =============================================================================

#[derive(Debug, Args)]
pub struct SalesArgs {
    /// Show only the most recent N sales
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesView {
    pub total_sales_value: Money,
    pub total_profit: Money,
    /// Newest first.
    pub sales: Vec<SaleRecord>,
}

impl Render for SalesView {
    fn render_text(&self, config: &ConfigState) -> String {
        if self.sales.is_empty() {
            return "No sales yet\n".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {} {} {} {}",
            pad("Date", 17),
            pad("Laptop", 28),
            pad("Qty", 4),
            pad("Price", 12),
            "Profit"
        );
        for sale in &self.sales {
            let _ = writeln!(
                out,
                "{} {} {} {} {}",
                pad(&sale.date_sold.format("%Y-%m-%d %H:%M").to_string(), 17),
                pad(&sale.spec.title(), 28),
                pad(&sale.quantity_sold.to_string(), 4),
                pad(&config.format_currency(sale.final_selling_price_per_unit), 12),
                config.format_currency(sale.total_profit)
            );
        }
        let _ = writeln!(
            out,
            "\n{}: sales {}, profit {}",
            plural(self.sales.len() as u64, "sale"),
            config.format_currency(self.total_sales_value),
            config.format_currency(self.total_profit)
        );
        out
    }
}

/// Sale history, newest first. Totals cover the listed sales only.
pub async fn sales(db: &Database, limit: Option<usize>) -> Result<SalesView, ApiError> {
    let mut sales = db.sales().list().await?;
    if let Some(limit) = limit {
        sales.truncate(limit);
    }

    Ok(SalesView {
        total_sales_value: sales.iter().map(SaleRecord::sales_value).sum(),
        total_profit: sales.iter().map(|s| s.total_profit).sum(),
        sales,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::stock::{add, inventory};
    use crate::commands::test_support::{at, draft, memory_db};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_sell_by_position_consumes_oldest() {
        let db = memory_db().await;
        let added = add(&db, draft("Dell", "Latitude 7420", 30_000), 3, at(0))
            .await
            .unwrap();

        let view = sell(
            &db,
            &GroupSelector::Position(1),
            2,
            Some(Money::from_major_minor(34_000, 0)),
            at(60),
        )
        .await
        .unwrap();

        assert_eq!(view.record.total_profit, Money::from_major_minor(8_000, 0));
        assert_eq!(
            view.removed_unit_ids,
            vec![added.units[0].id.clone(), added.units[1].id.clone()]
        );
        assert_eq!(view.remaining_in_group, 1);

        let inv = inventory(&db).await.unwrap();
        assert_eq!(inv.groups[0].unit_ids, vec![added.units[2].id.clone()]);
    }

    #[tokio::test]
    async fn test_sell_by_unit_id_and_default_price() {
        let db = memory_db().await;
        let mut d = draft("HP", "EliteBook 840", 21_000);
        d.target_selling_price = Some(Money::from_major_minor(25_000, 0));
        let added = add(&db, d, 2, at(0)).await.unwrap();

        // Any member id selects the group; the oldest unit is still sold.
        let selector = GroupSelector::UnitId(added.units[1].id.clone());
        let view = sell(&db, &selector, 1, None, at(1)).await.unwrap();

        assert_eq!(
            view.record.final_selling_price_per_unit,
            Money::from_major_minor(25_000, 0)
        );
        assert_eq!(view.removed_unit_ids, vec![added.units[0].id.clone()]);
    }

    #[tokio::test]
    async fn test_oversell_rejected_without_writes() {
        let db = memory_db().await;
        add(&db, draft("Asus", "ZenBook 14", 40_000), 2, at(0))
            .await
            .unwrap();

        let err = sell(&db, &GroupSelector::Position(1), 3, None, at(1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = sell(
            &db,
            &GroupSelector::Position(1),
            1,
            Some(Money::zero()),
            at(1),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(db.stock().count().await.unwrap(), 2);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_group() {
        let db = memory_db().await;
        let err = sell(&db, &GroupSelector::Position(1), 1, None, at(0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_sales_newest_first_with_limit() {
        let db = memory_db().await;
        add(&db, draft("Acer", "Swift 3", 20_000), 3, at(0))
            .await
            .unwrap();
        for (secs, price) in [(10, 22_000), (20, 19_000), (30, 25_000)] {
            sell(
                &db,
                &GroupSelector::Position(1),
                1,
                Some(Money::from_major_minor(price, 0)),
                at(secs),
            )
            .await
            .unwrap();
        }

        let all = sales(&db, None).await.unwrap();
        assert_eq!(all.sales.len(), 3);
        assert_eq!(all.sales[0].date_sold, at(30));
        assert_eq!(all.total_profit, Money::from_major_minor(6_000, 0));

        let latest = sales(&db, Some(1)).await.unwrap();
        assert_eq!(latest.sales.len(), 1);
        assert_eq!(latest.total_sales_value, Money::from_major_minor(25_000, 0));

        let text = all.render_text(&ConfigState::default());
        assert!(text.contains("-₹1000.00"));
        assert!(text.contains("3 sales"));
    }
}
