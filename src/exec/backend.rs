// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime talks to an `ExecutorBackend` instead of spawning processes
//! itself. Tests swap in a fake that records which nodes were started and
//! reports completions directly.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::engine::{RuntimeEvent, ScheduledNode};
use crate::errors::Result;

use super::node_runner::run_node;

/// Trait abstracting how scheduled nodes are executed.
///
/// Implementations must eventually send exactly one
/// [`RuntimeEvent::NodeCompleted`] per node they were given; the runtime
/// waits for it.
pub trait ExecutorBackend: Send {
    /// Start the given nodes.
    fn spawn_ready(
        &mut self,
        nodes: Vec<ScheduledNode>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production backend: one `tokio` task per node running its shell command.
pub struct CommandExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl CommandExecutor {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self { runtime_tx }
    }
}

impl ExecutorBackend for CommandExecutor {
    fn spawn_ready(
        &mut self,
        nodes: Vec<ScheduledNode>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        // Clone the sender so the future doesn't borrow `self` across `await`.
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            for node in nodes {
                tokio::spawn(run_node(node, tx.clone()));
            }
            Ok(())
        })
    }
}
