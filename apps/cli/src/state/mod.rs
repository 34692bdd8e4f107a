//! # State Module
//!
//! What a command needs besides its arguments.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  main                                                                   │
//! │    ConfigState::load(--config)   ── defaults → file → env               │
//! │    DbState::open(config.database_path())                                │
//! │          │                                  │                           │
//! │          ▼                                  ▼                           │
//! │  ┌──────────────────┐              ┌──────────────────────┐             │
//! │  │   ConfigState    │              │      DbState         │             │
//! │  │  currency symbol │              │  Database (pool)     │             │
//! │  │  recent_limit    │              │  stock() / sales()   │             │
//! │  │  log filter      │              │                      │             │
//! │  └──────────────────┘              └──────────────────────┘             │
//! │                                                                         │
//! │  ConfigState is read-only after startup.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;

pub use config::{default_config_path, ConfigError, ConfigState, MAX_RECENT_LIMIT};
pub use db::DbState;
