// src/config/mod.rs

//! Graph manifest loading and validation.
//!
//! - `model.rs` defines the TOML-backed data model.
//! - `loader.rs` reads a manifest from disk or a string.
//! - `validate.rs` checks names and references and builds a scheduler.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_from_str};
pub use model::{ConfigSection, GraphFile, NodeConfig, RawGraphFile};
