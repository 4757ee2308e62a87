//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use smellscope_core::stats::{SortKey, SortOrder};

/// smellscope -- code smell detection over a structural model.
///
/// Use `smellscope <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "smellscope", version, about, long_about = None)]
pub struct Cli {
    /// Path to the smellscope.toml configuration file.
    #[arg(short, long, global = true, default_value = "smellscope.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run all configured detectors (or reuse cached results).
    Run(RunArgs),

    /// Show incidents from the last run.
    Show(ShowArgs),

    /// Aggregate statistics over incidents from the last run.
    Stats,

    /// List configured detectors and whether they load.
    Detectors,

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- run ----

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Re-run detectors even when the cache matches the model.
    #[arg(short, long)]
    pub force: bool,
}

// ---- show ----

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Sort key.
    #[arg(long, default_value = "intensity")]
    pub sort: SortBy,

    /// Sort direction.
    #[arg(long, default_value = "decreasing")]
    pub order: Order,

    /// Hide incidents below this level.
    #[arg(long, default_value_t = 0)]
    pub min_level: u8,

    /// Show at most this many incidents.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortBy {
    Intensity,
    Type,
    File,
    Class,
    Note,
}

impl From<SortBy> for SortKey {
    fn from(value: SortBy) -> Self {
        match value {
            SortBy::Intensity => Self::Intensity,
            SortBy::Type => Self::Type,
            SortBy::File => Self::File,
            SortBy::Class => Self::Class,
            SortBy::Note => Self::Note,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Order {
    Increasing,
    Decreasing,
}

impl From<Order> for SortOrder {
    fn from(value: Order) -> Self {
        match value {
            Order::Increasing => Self::Increasing,
            Order::Decreasing => Self::Decreasing,
        }
    }
}

// ---- config ----

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, paths, runtime).
        #[arg(long)]
        section: Option<String>,
    },
}
