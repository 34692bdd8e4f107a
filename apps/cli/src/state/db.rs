//! # Database State
//!
//! Wraps the `Database` connection for use in commands.
//!
//! The `Database` from `laptrack-db` holds a `SqlitePool`, so commands can
//! borrow it freely; the pool does its own locking.

use laptrack_db::{Database, DbConfig};
use std::path::Path;
use tracing::info;

use crate::error::{ApiError, ErrorCode};

/// Wrapper around `Database` for command dispatch.
#[derive(Debug)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Opens (and migrates) the database file, creating its directory first.
    pub async fn open(path: &Path) -> Result<Self, ApiError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::new(
                    ErrorCode::CollaboratorUnavailable,
                    format!("Cannot create {}: {}", parent.display(), e),
                )
            })?;
        }

        let db = Database::new(DbConfig::new(path)).await?;
        info!(path = %path.display(), "Database ready");
        Ok(DbState::new(db))
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wraps_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = DbState::new(db);
        assert!(state.inner().health_check().await);
    }
}
