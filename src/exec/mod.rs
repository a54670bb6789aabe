// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `ExecutorBackend` trait and the production
//!   `CommandExecutor`; tests replace it with a fake.
//! - [`node_runner`] runs one node's command with `tokio::process::Command`
//!   and reports the outcome as a `RuntimeEvent`.

pub mod backend;
pub mod node_runner;

pub use backend::{CommandExecutor, ExecutorBackend};
