//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// locstream - Adaptive location reporter
#[derive(Parser, Debug)]
#[command(
    name = "locstream",
    author,
    version,
    about = "Adaptive location reporting engine",
    long_about = "Samples positions from a simulated walker, reports them to a \n\
                  remote caregiver service, and adapts the sampling profile from \n\
                  per-report server feedback."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LOCSTREAM_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "LOCSTREAM_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the reporting engine until interrupted
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Capture one fix, report it once, and exit
    SendOnce(SendOnceArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "config.toml", env = "LOCSTREAM_CONFIG")]
    pub config: PathBuf,

    /// Bearer token authenticating the reports
    #[arg(long, env = "LOCSTREAM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Room identifier the reports are attributed to
    #[arg(long, env = "LOCSTREAM_ROOM")]
    pub room: Option<String>,

    /// Override report endpoint from configuration
    #[arg(long, env = "LOCSTREAM_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Stop after this many seconds (0 = run until Ctrl+C)
    #[arg(long, default_value = "0", env = "LOCSTREAM_DURATION")]
    pub duration: u64,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = use configuration, disabled when unset there)
    #[arg(long, default_value = "0", env = "LOCSTREAM_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `send-once` command
#[derive(Parser, Debug)]
pub struct SendOnceArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "config.toml", env = "LOCSTREAM_CONFIG")]
    pub config: PathBuf,

    /// Bearer token authenticating the report
    #[arg(long, env = "LOCSTREAM_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Room identifier the report is attributed to
    #[arg(long, env = "LOCSTREAM_ROOM")]
    pub room: String,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
