//! # Inventory Snapshot
//!
//! In-memory copy of stock and sales that is loaded once and then kept
//! current from mutation results, instead of re-reading both collections
//! after every add or sale.
//!
//! ```text
//! load ──► InventorySnapshot { stock, sales }
//!              │                     ▲
//!              │ groups()/dashboard()│ apply_added(stored units)
//!              ▼                     │ apply_sale(&Settlement)
//!          derived views        store mutation results
//! ```

use serde::Serialize;

use crate::grouping::{group_units, Group};
use crate::reporting::{dashboard_stats, DashboardStats};
use crate::settlement::Settlement;
use crate::types::{SaleRecord, Unit};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventorySnapshot {
    stock: Vec<Unit>,
    sales: Vec<SaleRecord>,
}

impl InventorySnapshot {
    pub fn new(stock: Vec<Unit>, sales: Vec<SaleRecord>) -> Self {
        Self { stock, sales }
    }

    pub fn stock(&self) -> &[Unit] {
        &self.stock
    }

    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    /// Adds units returned by the store. Ids already present are skipped,
    /// matching the store's ignore-duplicates insert.
    pub fn apply_added(&mut self, units: impl IntoIterator<Item = Unit>) {
        for unit in units {
            if !self.stock.iter().any(|u| u.id == unit.id) {
                self.stock.push(unit);
            }
        }
    }

    /// Retires the settled units and records the sale.
    pub fn apply_sale(&mut self, settlement: &Settlement) {
        self.stock
            .retain(|u| !settlement.removed_unit_ids.contains(&u.id));
        if !self
            .sales
            .iter()
            .any(|s| s.sale_id == settlement.record.sale_id)
        {
            self.sales.push(settlement.record.clone());
        }
    }

    /// Groups recomputed from the current stock.
    pub fn groups(&self) -> Vec<Group> {
        group_units(&self.stock)
    }

    pub fn dashboard(&self) -> DashboardStats {
        dashboard_stats(&self.stock, &self.sales)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::tests::{t, unit};
    use crate::money::Money;
    use crate::settlement::settle;

    #[test]
    fn test_apply_added_then_sale() {
        let mut snap = InventorySnapshot::default();
        snap.apply_added(vec![
            unit("A", 1, "X", 100, t(1)),
            unit("B", 2, "X", 100, t(2)),
        ]);
        assert_eq!(snap.groups()[0].quantity(), 2);

        let settlement = settle(&snap.groups()[0], 1, Money::from_cents(150), t(3)).unwrap();
        snap.apply_sale(&settlement);

        let groups = snap.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].quantity(), 1);
        assert_eq!(groups[0].representative().id, "B");

        let stats = snap.dashboard();
        assert_eq!(stats.stock_count, 1);
        assert_eq!(stats.total_profit.cents(), 50);
    }

    #[test]
    fn test_duplicate_ids_ignored() {
        let mut snap = InventorySnapshot::new(vec![unit("A", 1, "X", 100, t(1))], vec![]);
        snap.apply_added(vec![unit("A", 9, "X", 999, t(9))]);
        assert_eq!(snap.stock().len(), 1);
        assert_eq!(snap.stock()[0].buying_cost.cents(), 100);
    }

    #[test]
    fn test_full_sale_empties_group() {
        let mut snap = InventorySnapshot::new(vec![unit("A", 1, "X", 100, t(1))], vec![]);
        let settlement = settle(&snap.groups()[0], 1, Money::from_cents(90), t(2)).unwrap();

        snap.apply_sale(&settlement);
        snap.apply_sale(&settlement);

        assert!(snap.groups().is_empty());
        assert_eq!(snap.sales().len(), 1);
    }
}
