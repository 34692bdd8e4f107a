//! # LapTrack CLI Library
//!
//! Argument parsing, startup and command dispatch for the `laptrack` binary.
//!
//! ## Module Organization
//! ```text
//! laptrack_cli/
//! ├── lib.rs          ◄─── You are here (CLI definition & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── ConfigState (defaults → file → env)
//! │   └── db.rs       ◄─── Database state wrapper
//! ├── commands/
//! │   ├── mod.rs      ◄─── Text / JSON output
//! │   ├── stock.rs    ◄─── add, inventory
//! │   ├── sale.rs     ◄─── sell, sales
//! │   └── dashboard.rs◄─── dashboard
//! └── error.rs        ◄─── ApiError for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::dashboard::DashboardArgs;
use commands::sale::{SalesArgs, SellArgs};
use commands::stock::AddArgs;
use commands::emit;
use error::ApiError;
use state::{ConfigState, DbState};

#[derive(Debug, Parser)]
#[command(name = "laptrack", version, about = "Stock and sales tracker for laptop resale")]
pub struct Cli {
    /// Config file (default: <config dir>/laptrack/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// SQLite database file; overrides config and LAPTRACK_DB_PATH
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Print results (and errors) as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a batch of identical laptops to stock
    Add(AddArgs),
    /// List stock grouped into identical units
    #[command(alias = "inv")]
    Inventory,
    /// Sell units from an inventory group, oldest first
    Sell(SellArgs),
    /// List recorded sales, newest first
    Sales(SalesArgs),
    /// Headline figures, recent activity and summaries
    Dashboard(DashboardArgs),
}

/// Runs the CLI and maps the outcome to a process exit code.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load configuration (defaults → config.toml → LAPTRACK_* env)        │
/// │  2. Initialize logging (RUST_LOG, else config log_filter) on stderr     │
/// │  3. Resolve database path (--db, else config, else data dir)            │
/// │  4. Open database, run pending migrations                               │
/// │  5. Dispatch the subcommand, print text or JSON                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> ExitCode {
    let json = cli.json;
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err, json);
            err.code.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> Result<(), ApiError> {
    let mut config = ConfigState::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database_path = Some(db);
    }

    init_tracing(&config.log_filter);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting LapTrack");

    let db_path = config.database_path()?;
    debug!(path = %db_path.display(), "Database path determined");
    let db = DbState::open(&db_path).await?;

    let result = dispatch(cli.command, &db, &config, cli.json).await;
    db.inner().close().await;
    result
}

async fn dispatch(
    command: Command,
    db: &DbState,
    config: &ConfigState,
    json: bool,
) -> Result<(), ApiError> {
    let db = db.inner();

    match command {
        Command::Add(args) => {
            let (draft, quantity) = args.into_draft();
            let view = commands::stock::add(db, draft, quantity, Utc::now()).await?;
            emit(&view, config, json)
        }
        Command::Inventory => {
            let view = commands::stock::inventory(db).await?;
            emit(&view, config, json)
        }
        Command::Sell(args) => {
            let view =
                commands::sale::sell(db, &args.group, args.quantity, args.price, Utc::now())
                    .await?;
            emit(&view, config, json)
        }
        Command::Sales(args) => {
            let view = commands::sale::sales(db, args.limit).await?;
            emit(&view, config, json)
        }
        Command::Dashboard(args) => {
            let limit = args.recent.unwrap_or(config.recent_limit);
            let view = commands::dashboard::dashboard(db, args.detail, limit).await?;
            emit(&view, config, json)
        }
    }
}

/// Prints a failed command's error: JSON on stdout with `--json`, else stderr.
fn report(err: &ApiError, json: bool) {
    if json {
        match serde_json::to_string_pretty(err) {
            Ok(body) => println!("{}", body),
            Err(_) => eprintln!("error {}", err),
        }
    } else {
        eprintln!("error {}", err);
    }
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=laptrack_db=trace` - Trace the store only
/// - Default: the configured `log_filter` (`info,laptrack=debug,sqlx=warn`)
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second init (e.g. from tests) is ignored.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use laptrack_core::{GroupSelector, Money};

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sell() {
        let cli = Cli::try_parse_from([
            "laptrack", "--json", "sell", "#2", "--quantity", "3", "--price", "52000",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Sell(args) => {
                assert_eq!(args.group, GroupSelector::Position(2));
                assert_eq!(args.quantity, 3);
                assert_eq!(args.price, Some(Money::from_major_minor(52_000, 0)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_dashboard_detail_and_global_db() {
        let cli = Cli::try_parse_from([
            "laptrack",
            "dashboard",
            "--detail",
            "stock-value",
            "--db",
            "/tmp/shop.db",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("/tmp/shop.db")));
        match cli.command {
            Command::Dashboard(args) => {
                assert_eq!(args.detail, Some(commands::dashboard::Detail::StockValue));
                assert_eq!(args.recent, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_recent_zero_rejected_by_parser() {
        assert!(Cli::try_parse_from(["laptrack", "dashboard", "--recent", "0"]).is_err());
        assert!(Cli::try_parse_from(["laptrack", "dashboard", "--recent", "500"]).is_err());

        let cli = Cli::try_parse_from(["laptrack", "dashboard", "--recent", "7"]).unwrap();
        match cli.command {
            Command::Dashboard(args) => assert_eq!(args.recent, Some(7)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_price_rejected_by_parser() {
        let err = Cli::try_parse_from(["laptrack", "sell", "1", "--price", "12.345"]);
        assert!(err.is_err());

        let err = Cli::try_parse_from(["laptrack", "sell", "1", "--price", "90000000000000000"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_bad_condition_rejected_by_parser() {
        let err = Cli::try_parse_from([
            "laptrack",
            "add",
            "--brand",
            "Dell",
            "--model",
            "X",
            "--processor",
            "i5",
            "--ram",
            "8",
            "--storage",
            "256GB",
            "--cost",
            "100",
            "--condition",
            "refurbished",
        ]);
        assert!(err.is_err());
    }
}
