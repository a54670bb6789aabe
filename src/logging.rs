// src/logging.rs

//! Logging setup for `toposched` using `tracing` + `tracing-subscriber`.
//!
//! Filter resolution:
//! 1. `--log-level` sets a single level for everything;
//! 2. otherwise `TOPOSCHED_LOG` is read as an `EnvFilter` directive string
//!    (e.g. `"warn,toposched::dag=trace"`);
//! 3. otherwise `info`.
//!
//! Logs go to STDERR; STDOUT carries only the orders printed by the CLI.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable consulted when no CLI level is given.
pub const LOG_ENV_VAR: &str = "TOPOSCHED_LOG";

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV_VAR).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

/// Pick the filter from the CLI level or the raw env directive string.
///
/// Invalid env directives fall back to `info` instead of failing startup.
pub fn build_filter(cli_level: Option<LogLevel>, env_directives: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level_directive(level));
    }

    env_directives
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
