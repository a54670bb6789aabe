// src/dag/mod.rs

//! Dependency graph and incremental scheduling.
//!
//! - [`graph`] is the node registry: keys, arena indices and edges.
//! - [`cycle`] finds a deterministic cycle representative at prepare time.
//! - [`tracker`] holds the per-run ready-set state machine.
//! - [`scheduler`] is the public facade tying the pieces together.
//! - [`shared`] wraps a scheduler in a mutex for multi-worker callers.
//! - [`node_state`] defines the per-node lifecycle.

pub mod cycle;
pub mod graph;
pub mod node_state;
pub mod scheduler;
pub mod shared;
pub mod tracker;

pub use graph::DepGraph;
pub use node_state::NodeState;
pub use scheduler::Scheduler;
pub use shared::SharedScheduler;
