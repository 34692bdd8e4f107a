//! # Commands Module
//!
//! One function per operator action. Each takes the database plus plain
//! arguments and returns a serializable view, so it can be tested without
//! parsing a command line or capturing stdout.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── Output plumbing (text or --json)
//! ├── stock.rs      ◄─── add, inventory
//! ├── sale.rs       ◄─── sell, sales
//! └── dashboard.rs  ◄─── dashboard (+ --detail summaries)
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  laptrack sell 2 --quantity 1 --price 52000                             │
//! │         │                                                               │
//! │         ▼  clap                                                         │
//! │  SellArgs { group: #2, quantity: 1, price: Some(₹52000.00) }            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  sale::sell(db.inner(), &selector, 1, price, Utc::now())                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  SaleView ──► emit(view, config, json)                                  │
//! │                 ├── --json: serde_json::to_string_pretty                │
//! │                 └── text:   view.render_text(config)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod dashboard;
pub mod sale;
pub mod stock;

use serde::Serialize;

use crate::error::ApiError;
use crate::state::ConfigState;

/// A command result that can be shown to the operator.
pub trait Render: Serialize {
    /// Human-readable output, ending with a newline.
    fn render_text(&self, config: &ConfigState) -> String;
}

/// Prints a view to stdout as text or pretty JSON.
pub fn emit<T: Render>(view: &T, config: &ConfigState, json: bool) -> Result<(), ApiError> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", view.render_text(config));
    }
    Ok(())
}

/// Pads `s` to `width` characters (not bytes, so ₹ lines up).
pub(crate) fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

pub(crate) fn plural(n: u64, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use laptrack_core::{Condition, Money, UnitDraft};
    use laptrack_db::{Database, DbConfig};

    pub async fn memory_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_717_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    pub fn draft(brand: &str, model: &str, cost_rupees: i64) -> UnitDraft {
        UnitDraft {
            brand: brand.to_string(),
            model: model.to_string(),
            processor: "Intel Core i5-1135G7".to_string(),
            ram_gb: 16,
            storage: "512GB SSD".to_string(),
            graphics_card: None,
            condition: Condition::Used,
            buying_cost: Money::from_major_minor(cost_rupees, 0),
            target_selling_price: None,
            image_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_counts_chars() {
        assert_eq!(pad("₹10.00", 8), "₹10.00  ");
        assert_eq!(pad("toolong", 3), "toolong");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "unit"), "1 unit");
        assert_eq!(plural(0, "unit"), "0 units");
        assert_eq!(plural(3, "sale"), "3 sales");
    }
}
