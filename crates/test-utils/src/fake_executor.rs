use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use toposched::engine::{NodeOutcome, RuntimeEvent, ScheduledNode};
use toposched::errors::Result;
use toposched::exec::ExecutorBackend;

/// A fake executor that:
/// - records which nodes were started, in order
/// - immediately reports `NodeCompleted` for each node, failing the ones
///   listed in `failing` with exit code 1.
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    executed: Arc<Mutex<Vec<String>>>,
    failing: HashSet<String>,
}

impl FakeExecutor {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, executed: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            runtime_tx,
            executed,
            failing: HashSet::new(),
        }
    }

    pub fn failing(mut self, node: &str) -> Self {
        self.failing.insert(node.to_string());
        self
    }
}

impl ExecutorBackend for FakeExecutor {
    fn spawn_ready(
        &mut self,
        nodes: Vec<ScheduledNode>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);
        let failing = self.failing.clone();

        Box::pin(async move {
            for n in nodes {
                executed.lock().unwrap().push(n.name.clone());

                let outcome = if failing.contains(&n.name) {
                    NodeOutcome::Failed(1)
                } else {
                    NodeOutcome::Success
                };

                tx.send(RuntimeEvent::NodeCompleted {
                    node: n.name,
                    outcome,
                })
                .await
                .map_err(anyhow::Error::from)?;
            }
            Ok(())
        })
    }
}
