//! # laptrack-core: Pure Business Logic for LapTrack
//!
//! This crate holds the rules of the laptop resale tracker as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        LapTrack Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    laptrack CLI (apps/cli)                      │   │
//! │  │     add ──► inventory ──► sell ──► sales ──► dashboard          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ laptrack-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌────────────┐ ┌─────────────┐     │   │
//! │  │  │ grouping │ │settlement│ │ reporting  │ │  snapshot   │     │   │
//! │  │  │  Group   │ │  FIFO    │ │ Dashboard  │ │ projection  │     │   │
//! │  │  └──────────┘ └──────────┘ └────────────┘ └─────────────┘     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 laptrack-db (Unit Record Store)                 │   │
//! │  │          laptops_stock, laptops_sold, atomic commit_sale        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Unit, SaleRecord, Condition, UnitDraft)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//! - [`grouping`] - Groups identical stock units
//! - [`settlement`] - Oldest-first sale settlement and profit
//! - [`reporting`] - Dashboard statistics and breakdowns
//! - [`snapshot`] - In-memory projection of stock and sales
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use laptrack_core::{group_units, settle, Condition, Money, UnitDraft};
//!
//! let draft = UnitDraft {
//!     brand: "Dell".to_string(),
//!     model: "Latitude 7420".to_string(),
//!     processor: "i7-1185G7".to_string(),
//!     ram_gb: 16,
//!     storage: "512GB SSD".to_string(),
//!     graphics_card: None,
//!     condition: Condition::Used,
//!     buying_cost: Money::from_major_minor(30_000, 0),
//!     target_selling_price: None,
//!     image_url: None,
//! };
//!
//! let units: Vec<_> = draft
//!     .into_batch(2, Utc::now())
//!     .unwrap()
//!     .into_iter()
//!     .enumerate()
//!     .map(|(i, u)| u.into_unit(i as i64 + 1))
//!     .collect();
//!
//! let groups = group_units(&units);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].quantity(), 2);
//!
//! let sale = settle(&groups[0], 1, Money::from_major_minor(35_000, 0), Utc::now()).unwrap();
//! assert_eq!(sale.record.total_profit, Money::from_major_minor(5_000, 0));
//! assert_eq!(sale.removed_unit_ids, vec![units[0].id.clone()]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod grouping;
pub mod money;
pub mod reporting;
pub mod settlement;
pub mod snapshot;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use grouping::{find_group, group_units, Group, GroupKey, GroupSelector};
pub use money::{Money, MAX_AMOUNT};
pub use reporting::{
    dashboard_stats, profit_summary, recent_sales, recent_stock, sales_value_summary,
    stock_summary, stock_value_summary, Breakdown, DashboardStats, ProfitSummary,
    SalesValueSummary, StockSummary, StockValueSummary,
};
pub use settlement::{default_sale_price, settle, Settlement};
pub use snapshot::InventorySnapshot;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Placeholder used in the group key when a unit has no discrete GPU.
pub const NO_GRAPHICS_CARD: &str = "N/A";

/// Maximum number of units accepted in a single "add N" batch.
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 1000 instead of 10).
pub const MAX_BATCH_QUANTITY: u32 = 500;
