use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rotate a stable-token position between an Aave pool and a Silo market
/// through a smart account, on a fixed schedule.
#[derive(Parser)]
#[command(name = "fund-rotator", version, about)]
pub struct Cli {
    /// Log level or tracing directive string (e.g. "debug" or "fund_rotator=trace")
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the rotation for the configured number of cycles
    Run {
        /// Path to the rotation config JSON file
        config: PathBuf,

        /// Assemble and log every batch without submitting it
        #[arg(long)]
        dry_run: bool,

        /// Override the configured cycle count
        #[arg(long)]
        cycles: Option<u32>,

        /// Override the configured hold duration (seconds)
        #[arg(long)]
        hold_secs: Option<u64>,

        /// Override the configured amount (human units, e.g. "250.5")
        #[arg(long)]
        amount: Option<String>,
    },

    /// Validate a rotation config file
    Validate {
        /// Path to the rotation config JSON file
        config: PathBuf,
    },

    /// Show the account's token and silo balances and check the configured amount
    Balance {
        /// Path to the rotation config JSON file
        config: PathBuf,
    },

    /// Output an example config JSON to stdout
    Example,
}
