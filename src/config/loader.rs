// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{GraphFile, RawGraphFile};
use crate::errors::Result;

/// Load a graph manifest from `path` without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawGraphFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    load_from_str(&contents)
}

/// Parse a graph manifest from a TOML string without semantic validation.
pub fn load_from_str(contents: &str) -> Result<RawGraphFile> {
    let raw: RawGraphFile = toml::from_str(contents)?;
    Ok(raw)
}

/// Load a graph manifest and validate it.
///
/// Checks for:
/// - at least one node, unique non-empty names,
/// - `max_parallel >= 1`,
/// - `after` entries naming declared nodes.
///
/// Cycles are left to [`crate::dag::Scheduler::prepare`], which reports the
/// offending path.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<GraphFile> {
    let raw = load_from_path(&path)?;
    GraphFile::try_from(raw)
}

/// Default manifest path: `Toposched.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Toposched.toml")
}
