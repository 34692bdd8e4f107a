//! # LapTrack CLI Entry Point
//!
//! ```text
//! laptrack add --brand Dell --model "Latitude 7420" --processor i7 \
//!              --ram 16 --storage "512GB SSD" --cost 30000 -q 3
//! laptrack inventory
//! laptrack sell 1 --quantity 2 --price 34000
//! laptrack dashboard --detail profit
//! ```
//!
//! The actual setup is in lib.rs so it can be tested.

use clap::Parser;
use laptrack_cli::{run, Cli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    run(Cli::parse()).await
}
