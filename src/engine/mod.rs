// src/engine/mod.rs

//! Run loop that drives a [`crate::dag::Scheduler`] against an executor.
//!
//! The scheduler only orders nodes. The engine is one concrete caller of the
//! pull protocol: it takes ready batches, hands them to an
//! [`crate::exec::ExecutorBackend`], and reports completions back with
//! `done`. Failure handling is decided here, never in the scheduler.

pub mod runtime;

use crate::types::FailurePolicy;

/// Node key type used by the engine and the manifest.
pub type NodeName = String;

/// Outcome of one node's work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    Success,
    Failed(i32),
}

/// A node the runtime wants the executor to start now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledNode {
    pub name: NodeName,
    /// `None` for nodes that only order other nodes.
    pub cmd: Option<String>,
}

/// Events flowing into the runtime.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// The executor finished a node.
    NodeCompleted {
        node: NodeName,
        outcome: NodeOutcome,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C): start nothing new.
    ShutdownRequested,
}

#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Upper bound on nodes handed to the executor at once. Always >= 1.
    pub max_parallel: usize,
    pub on_failure: FailurePolicy,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            max_parallel: 1,
            on_failure: FailurePolicy::Abort,
        }
    }
}

/// Summary of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Nodes reported done, in completion order.
    pub completed: Vec<NodeName>,
    /// Nodes whose work failed, with their exit code.
    pub failed: Vec<(NodeName, i32)>,
    /// Nodes that never ran, in insertion order.
    pub skipped: Vec<NodeName>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

pub use runtime::Runtime;
