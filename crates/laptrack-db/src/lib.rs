//! # laptrack-db: Unit Record Store for LapTrack
//!
//! SQLite storage for the two resources the tracker works with: laptops in
//! stock and finalized sale records.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        LapTrack Data Flow                               │
//! │                                                                         │
//! │  laptrack sell 2 --quantity 1 --price 52000                             │
//! │       │                                                                 │
//! │       ▼  laptrack_core::settle() picks the oldest unit                  │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   laptrack-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │ SqlitePool    │◄───│ StockRepository│    │ 001_initial  │  │   │
//! │  │   │               │    │ SaleRepository │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SQLite: laptops_stock, laptops_sold                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use laptrack_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("laptrack.db")).await?;
//!
//! let stored = db.stock().add_units(&draft.into_batch(3, Utc::now())?).await?;
//! let groups = laptrack_core::group_units(&db.stock().list().await?);
//!
//! let settlement = laptrack_core::settle(&groups[0], 1, price, Utc::now())?;
//! let record = db.sales().commit_sale(&settlement).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::sale::SaleRepository;
pub use repository::stock::StockRepository;
