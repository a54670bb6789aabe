// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `toposched`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "toposched",
    version,
    about = "Order, check and run dependency graphs.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the graph manifest (TOML).
    #[arg(long, value_name = "PATH", default_value = "Toposched.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TOPOSCHED_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print one valid topological order, one node per line.
    Order,
    /// Print the groups of nodes that can run in parallel, one group per line.
    Batches,
    /// Only check the graph for unknown references and cycles.
    Check,
    /// Run every node's `cmd`, respecting dependencies.
    Run {
        /// Maximum number of commands running at once
        /// (overrides `[config].max_parallel`).
        #[arg(long, short = 'j', value_name = "N")]
        jobs: Option<usize>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
