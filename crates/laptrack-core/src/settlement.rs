//! # Sale Settlement
//!
//! Decides which concrete units a sale consumes and what it earned.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Group (Dell Latitude 7420 × 3)      sell 2 @ ₹52,000                   │
//! │       │                                                                 │
//! │       ▼  validate: 1 ≤ 2 ≤ 3, price > 0                                 │
//! │       ▼  re-sort members by (date_added, seq)                           │
//! │  [u1 (oldest), u2, u3]                                                  │
//! │   └──┬───┘                                                              │
//! │      ▼  take first 2 (FIFO)                                             │
//! │  Settlement {                                                           │
//! │      record: SaleRecord { quantity_sold: 2, total_profit, ... },        │
//! │      removed_unit_ids: [u1, u2],                                        │
//! │  }                                                                      │
//! │       │                                                                 │
//! │       ▼  laptrack-db: delete ids + insert record in ONE transaction     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here touches the store. Validation failures return before a
//! `Settlement` exists, so they can never cause a store mutation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{CoreResult, ValidationError};
use crate::grouping::Group;
use crate::money::Money;
use crate::types::{SaleRecord, Unit};
use crate::validation::{validate_sale_quantity, validate_unit_price};

/// Outcome of settling a sale: the record to append and the units to retire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settlement {
    pub record: SaleRecord,
    /// Unique ids, oldest unit first.
    pub removed_unit_ids: Vec<String>,
}

impl Settlement {
    pub fn quantity(&self) -> u32 {
        self.record.quantity_sold
    }
}

/// Settles a sale of `quantity` units from `group` at `unit_price` each.
///
/// The oldest members are consumed first. The record's attribute snapshot,
/// buying cost and `date_added_original` come from the group representative.
///
/// ## Errors
/// `CoreError::Validation` when `quantity` is outside `1..=group.quantity()`,
/// `unit_price` is not in `(0, MAX_AMOUNT]`, or the sale's revenue or
/// profit would not fit in an i64.
pub fn settle(
    group: &Group,
    quantity: u32,
    unit_price: Money,
    sold_at: DateTime<Utc>,
) -> CoreResult<Settlement> {
    validate_sale_quantity(quantity, group.quantity())?;
    validate_unit_price(unit_price)?;

    let mut members: Vec<&Unit> = group.members().iter().collect();
    members.sort_by(|a, b| a.age_key().cmp(&b.age_key()).then_with(|| a.id.cmp(&b.id)));

    let removed_unit_ids: Vec<String> = members
        .iter()
        .take(quantity as usize)
        .map(|u| u.id.clone())
        .collect();

    let rep = group.representative();
    let buying_cost_per_unit = rep.buying_cost;
    let overflow = |field: &str| ValidationError::TooLarge {
        field: field.to_string(),
        max: Money::from_cents(i64::MAX),
    };
    unit_price
        .checked_multiply_quantity(quantity)
        .ok_or_else(|| overflow("sales value"))?;
    let total_profit = unit_price
        .checked_sub(buying_cost_per_unit)
        .and_then(|margin| margin.checked_multiply_quantity(quantity))
        .ok_or_else(|| overflow("total profit"))?;

    let record = SaleRecord {
        sale_id: uuid::Uuid::new_v4().to_string(),
        spec: rep.spec.clone(),
        buying_cost_per_unit,
        final_selling_price_per_unit: unit_price,
        quantity_sold: quantity,
        total_profit,
        date_sold: sold_at,
        date_added_original: rep.date_added,
        image_url: rep.image_url.clone(),
    };

    Ok(Settlement {
        record,
        removed_unit_ids,
    })
}

/// Price pre-filled when the operator starts a sale: the representative's
/// target selling price, or its buying cost when no target was set.
pub fn default_sale_price(group: &Group) -> Money {
    let rep = group.representative();
    rep.target_selling_price.unwrap_or(rep.buying_cost)
}

// =============================================================================
// Unit Tests
// =============================================================================
