//! # Stock Commands
//!
//! `add` records a batch of identical laptops; `inventory` lists the
//! grouped stock with the position numbers `sell` accepts.
//!
//! ## Inventory View
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  #  Laptop               Specs                        Cost      Qty    │
//! │  1  Dell Latitude 7420   i7 / 16GB / 512GB / N/A      ₹30000.00   3    │
//! │  2  HP EliteBook 840     i5 / 8GB / 256GB / N/A       ₹21000.00   1    │
//! │                                                                         │
//! │  Each row is one group: same attributes, same buying cost.              │
//! │  Rows are recomputed from the stored units on every call.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use clap::Args;
use laptrack_core::{group_units, Condition, LaptopSpec, Money, Unit, UnitDraft};
use laptrack_db::Database;
use serde::Serialize;
use std::fmt::Write;
use tracing::info;

use super::{pad, plural, Render};
use crate::error::ApiError;
use crate::state::ConfigState;

// =============================================================================
// add
// =============================================================================

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub brand: String,

    #[arg(long)]
    pub model: String,

    #[arg(long)]
    pub processor: String,

    /// RAM in GB
    #[arg(long = "ram", value_name = "GB")]
    pub ram_gb: u32,

    #[arg(long)]
    pub storage: String,

    /// Dedicated graphics card, if any
    #[arg(long = "gpu")]
    pub graphics_card: Option<String>,

    /// new or used
    #[arg(long, default_value = "used")]
    pub condition: Condition,

    /// Buying cost per unit, e.g. 45999.50
    #[arg(long = "cost", value_name = "AMOUNT")]
    pub buying_cost: Money,

    /// Intended selling price per unit
    #[arg(long = "target-price", value_name = "AMOUNT")]
    pub target_selling_price: Option<Money>,

    #[arg(long)]
    pub image_url: Option<String>,

    /// Number of identical units in this batch
    #[arg(long, short = 'q', default_value_t = 1)]
    pub quantity: u32,
}

impl AddArgs {
    pub fn into_draft(self) -> (UnitDraft, u32) {
        let draft = UnitDraft {
            brand: self.brand,
            model: self.model,
            processor: self.processor,
            ram_gb: self.ram_gb,
            storage: self.storage,
            graphics_card: self.graphics_card,
            condition: self.condition,
            buying_cost: self.buying_cost,
            target_selling_price: self.target_selling_price,
            image_url: self.image_url,
        };
        (draft, self.quantity)
    }
}

/// Units stored by one `add`.
#[derive(Debug, Clone, Serialize)]
pub struct AddedView {
    pub units: Vec<Unit>,
}

impl Render for AddedView {
    fn render_text(&self, config: &ConfigState) -> String {
        let Some(first) = self.units.first() else {
            return "No units added (all ids already present)\n".to_string();
        };

        let mut out = format!(
            "Added {} of {} at {} each\n",
            plural(self.units.len() as u64, "unit"),
            first.spec.title(),
            config.format_currency(first.buying_cost),
        );
        for unit in &self.units {
            let _ = writeln!(out, "  {}", unit.id);
        }
        out
    }
}

/// Validates the draft, expands it into `quantity` units and stores them.
pub async fn add(
    db: &Database,
    draft: UnitDraft,
    quantity: u32,
    now: DateTime<Utc>,
) -> Result<AddedView, ApiError> {
    let batch = draft.into_batch(quantity, now)?;
    let units = db.stock().add_units(&batch).await?;

    info!(
        quantity = units.len(),
        brand = units.first().map(|u| u.spec.brand.as_str()).unwrap_or_default(),
        "Stock added"
    );
    Ok(AddedView { units })
}

// =============================================================================
// inventory
// =============================================================================

/// One grouped row of the inventory.
#[derive(Debug, Clone, Serialize)]
pub struct GroupRow {
    /// 1-based; what `sell` accepts.
    pub position: usize,
    #[serde(flatten)]
    pub spec: LaptopSpec,
    pub buying_cost: Money,
    pub target_selling_price: Option<Money>,
    pub quantity: u32,
    /// Earliest `date_added` in the group.
    pub date_added: DateTime<Utc>,
    pub image_url: Option<String>,
    /// Oldest first, i.e. the order a sale consumes them in.
    pub unit_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryView {
    pub total_units: u64,
    pub total_value: Money,
    pub groups: Vec<GroupRow>,
}

impl Render for InventoryView {
    fn render_text(&self, config: &ConfigState) -> String {
        if self.groups.is_empty() {
            return "Inventory is empty\n".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {} {} {} {} {}",
            pad("#", 4),
            pad("Laptop", 28),
            pad("Specs", 44),
            pad("Cond", 5),
            pad("Cost", 12),
            "Qty"
        );
        for row in &self.groups {
            let specs = format!(
                "{} / {}GB / {} / {}",
                row.spec.processor,
                row.spec.ram_gb,
                row.spec.storage,
                row.spec.graphics_card_label()
            );
            let _ = writeln!(
                out,
                "{} {} {} {} {} {}",
                pad(&row.position.to_string(), 4),
                pad(&row.spec.title(), 28),
                pad(&specs, 44),
                pad(row.spec.condition.as_str(), 5),
                pad(&config.format_currency(row.buying_cost), 12),
                row.quantity
            );
        }
        let _ = writeln!(
            out,
            "\n{} in {}, stock value {}",
            plural(self.total_units, "unit"),
            plural(self.groups.len() as u64, "group"),
            config.format_currency(self.total_value)
        );
        out
    }
}

/// Groups the current stock.
pub async fn inventory(db: &Database) -> Result<InventoryView, ApiError> {
    let stock = db.stock().list().await?;
    let groups = group_units(&stock);

    let rows = groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let rep = group.representative();
            GroupRow {
                position: i + 1,
                spec: rep.spec.clone(),
                buying_cost: rep.buying_cost,
                target_selling_price: rep.target_selling_price,
                quantity: group.quantity(),
                date_added: rep.date_added,
                image_url: rep.image_url.clone(),
                unit_ids: group.members().iter().map(|u| u.id.clone()).collect(),
            }
        })
        .collect();

    Ok(InventoryView {
        total_units: stock.len() as u64,
        total_value: stock.iter().map(|u| u.buying_cost).sum(),
        groups: rows,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{at, draft, memory_db};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_add_then_inventory_shows_one_group() {
        let db = memory_db().await;
        let added = add(&db, draft("Dell", "Latitude 7420", 30_000), 3, at(0))
            .await
            .unwrap();
        assert_eq!(added.units.len(), 3);

        let view = inventory(&db).await.unwrap();
        assert_eq!(view.groups.len(), 1);
        assert_eq!(view.groups[0].position, 1);
        assert_eq!(view.groups[0].quantity, 3);
        assert_eq!(view.total_value, Money::from_major_minor(90_000, 0));
        assert_eq!(view.groups[0].unit_ids[0], added.units[0].id);
    }

    #[tokio::test]
    async fn test_batches_added_later_merge_into_existing_group() {
        let db = memory_db().await;
        add(&db, draft("HP", "EliteBook 840", 21_000), 1, at(0)).await.unwrap();
        add(&db, draft("Dell", "XPS 13", 55_000), 1, at(5)).await.unwrap();
        add(&db, draft("HP", "EliteBook 840", 21_000), 2, at(10)).await.unwrap();

        let view = inventory(&db).await.unwrap();
        let summary: Vec<_> = view
            .groups
            .iter()
            .map(|g| (g.spec.brand.as_str(), g.quantity))
            .collect();
        assert_eq!(summary, vec![("Dell", 1), ("HP", 3)]);
    }

    #[tokio::test]
    async fn test_invalid_draft_writes_nothing() {
        let db = memory_db().await;
        let mut bad = draft("Dell", "Latitude", 30_000);
        bad.buying_cost = Money::zero();

        let err = add(&db, bad, 2, at(0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(db.stock().count().await.unwrap(), 0);

        let err = add(&db, draft("Dell", "Latitude", 30_000), 0, at(0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_inventory_text() {
        let db = memory_db().await;
        add(&db, draft("Lenovo", "ThinkPad T14", 28_500), 2, at(0))
            .await
            .unwrap();

        let text = inventory(&db)
            .await
            .unwrap()
            .render_text(&ConfigState::default());
        assert!(text.contains("Lenovo ThinkPad T14"));
        assert!(text.contains("₹28500.00"));
        assert!(text.contains("2 units in 1 group"));
    }

    #[tokio::test]
    async fn test_empty_inventory() {
        let db = memory_db().await;
        let view = inventory(&db).await.unwrap();
        assert!(view.groups.is_empty());
        assert_eq!(view.total_value, Money::zero());
        assert_eq!(
            view.render_text(&ConfigState::default()),
            "Inventory is empty\n"
        );
    }

    #[test]
    fn test_add_args_into_draft() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AddArgs,
        }

        let w = Wrapper::try_parse_from([
            "add",
            "--brand",
            "Apple",
            "--model",
            "MacBook Air M1",
            "--processor",
            "M1",
            "--ram",
            "8",
            "--storage",
            "256GB SSD",
            "--condition",
            "New",
            "--cost",
            "61999.5",
            "-q",
            "2",
        ])
        .unwrap();

        let (draft, qty) = w.args.into_draft();
        assert_eq!(qty, 2);
        assert_eq!(draft.condition, Condition::New);
        assert_eq!(draft.buying_cost, Money::from_cents(6_199_950));
        assert_eq!(draft.graphics_card, None);
    }
}
