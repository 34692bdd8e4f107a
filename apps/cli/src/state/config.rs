//! # Configuration State
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order, last wins)
//! 1. Defaults (this file)
//! 2. Config file (`--config <path>` or `<config dir>/laptrack/config.toml`)
//! 3. Environment variables (`LAPTRACK_*`)
//! 4. Command line flags (`--db`)
//!
//! ## Example config.toml
//! ```toml
//! database_path = "/srv/laptrack/laptrack.db"
//! currency_symbol = "₹"
//! log_filter = "info,laptrack=debug,sqlx=warn"
//! recent_limit = 5
//! ```

use directories::ProjectDirs;
use laptrack_core::Money;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const ENV_DB_PATH: &str = "LAPTRACK_DB_PATH";
pub const ENV_CURRENCY_SYMBOL: &str = "LAPTRACK_CURRENCY_SYMBOL";
pub const ENV_LOG: &str = "LAPTRACK_LOG";
pub const ENV_RECENT_LIMIT: &str = "LAPTRACK_RECENT_LIMIT";

/// Upper bound for the dashboard's recent activity lists.
pub const MAX_RECENT_LIMIT: usize = 100;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    /// No home directory, so there is no default location for files.
    #[error("Could not determine the application data directory")]
    NoDataDirectory,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// SQLite file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Symbol shown in front of amounts.
    pub currency_symbol: String,

    /// tracing filter used when `RUST_LOG` is not set.
    pub log_filter: String,

    /// How many recent sales / additions the dashboard lists.
    pub recent_limit: usize,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            database_path: None,
            currency_symbol: "₹".to_string(),
            log_filter: "info,laptrack=debug,sqlx=warn".to_string(),
            recent_limit: 5,
        }
    }
}

impl ConfigState {
    /// Loads defaults, then the config file, then the environment.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => ConfigState::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");

        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overrides fields from `LAPTRACK_*` variables.
    ///
    /// Takes a lookup function so tests don't touch the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.is_empty()) {
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(symbol) = lookup(ENV_CURRENCY_SYMBOL) {
            self.currency_symbol = symbol;
        }

        if let Some(filter) = lookup(ENV_LOG).filter(|f| !f.is_empty()) {
            self.log_filter = filter;
        }

        if let Some(limit) = lookup(ENV_RECENT_LIMIT) {
            self.recent_limit = limit.trim().parse().map_err(|_| ConfigError::Invalid {
                key: ENV_RECENT_LIMIT.to_string(),
                reason: format!("'{}' is not a number", limit),
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "currency_symbol".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if !(1..=MAX_RECENT_LIMIT).contains(&self.recent_limit) {
            return Err(ConfigError::Invalid {
                key: "recent_limit".to_string(),
                reason: format!("must be between 1 and {}", MAX_RECENT_LIMIT),
            });
        }

        Ok(())
    }

    /// The database file to open.
    ///
    /// ## Platform-Specific Defaults
    /// - **Linux**: `~/.local/share/laptrack/laptrack.db`
    /// - **macOS**: `~/Library/Application Support/com.laptrack.laptrack/laptrack.db`
    /// - **Windows**: `%APPDATA%\laptrack\laptrack\data\laptrack.db`
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoDataDirectory)?;
        Ok(dirs.data_dir().join("laptrack.db"))
    }

    /// Formats an amount with the configured currency symbol.
    pub fn format_currency(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "laptrack", "laptrack")
}

/// `<config dir>/config.toml`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ConfigState::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.currency_symbol, "₹");
        assert_eq!(config.recent_limit, 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ConfigState = toml::from_str(r#"currency_symbol = "$""#).unwrap();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.recent_limit, 5);
        assert_eq!(config.database_path, None);
    }

    #[test]
    fn test_full_toml() {
        let config: ConfigState = toml::from_str(
            r#"
            database_path = "/srv/laptrack/shop.db"
            currency_symbol = "Rs "
            log_filter = "warn"
            recent_limit = 10
            "#,
        )
        .unwrap();

        assert_eq!(
            config.database_path.as_deref(),
            Some(Path::new("/srv/laptrack/shop.db"))
        );
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.recent_limit, 10);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: ConfigState = toml::from_str(r#"recent_limit = 10"#).unwrap();
        config
            .apply_env(env(&[
                (ENV_RECENT_LIMIT, "3"),
                (ENV_DB_PATH, "/tmp/env.db"),
                (ENV_LOG, "debug"),
            ]))
            .unwrap();

        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/env.db"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_env_rejects_bad_limit() {
        let mut config = ConfigState::default();
        let err = config
            .apply_env(env(&[(ENV_RECENT_LIMIT, "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_validate_limits() {
        let mut config = ConfigState::default();
        config.recent_limit = 0;
        assert!(config.validate().is_err());

        config.recent_limit = MAX_RECENT_LIMIT;
        assert!(config.validate().is_ok());

        config.currency_symbol = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = ConfigState::load(Some(Path::new("/nonexistent/laptrack.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(4_599_910)), "₹45999.10");
        assert_eq!(config.format_currency(Money::from_cents(-2_500)), "-₹25.00");
        assert_eq!(config.format_currency(Money::zero()), "₹0.00");
    }
}
