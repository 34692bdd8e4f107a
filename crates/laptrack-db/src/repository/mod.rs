//! # Repository Module
//!
//! One repository per stored resource.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLI command                                                            │
//! │       │                                                                 │
//! │       │  db.stock().add_units(&batch)     db.sales().commit_sale(&s)    │
//! │       ▼                                   ▼                             │
//! │  StockRepository                      SaleRepository                    │
//! │  ├── list()                           ├── list()                        │
//! │  ├── count()                          ├── count()                       │
//! │  ├── get_by_id(id)                    ├── get_by_id(sale_id)            │
//! │  └── add_units(&[NewUnit])            └── commit_sale(&Settlement)      │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  laptops_stock  ◄──── DELETE (same transaction) ──── laptops_sold       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries are checked at runtime (`sqlx::query` / `query_as`) and rows
//! are decoded into private `FromRow` structs, then converted into the
//! laptrack-core types.

pub mod sale;
pub mod stock;

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{DbError, DbResult};

/// Timestamps are stored as Unix epoch milliseconds.
pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(column: &str, ms: i64) -> DbResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| DbError::invalid_row(column, format!("timestamp {} out of range", ms)))
}

/// Integer columns that must fit a `u32` (RAM size, quantity).
pub(crate) fn to_u32(column: &str, value: i64) -> DbResult<u32> {
    u32::try_from(value).map_err(|_| DbError::invalid_row(column, format!("{} is not a valid count", value)))
}
