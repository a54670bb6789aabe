// src/engine/runtime.rs

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::GraphFile;
use crate::dag::Scheduler;
use crate::errors::Result;
use crate::exec::ExecutorBackend;
use crate::types::FailurePolicy;

use super::{NodeName, NodeOutcome, RunReport, RuntimeEvent, RuntimeOptions, ScheduledNode};

/// Drives a scheduler to completion, delegating node work to an
/// [`ExecutorBackend`].
///
/// Nodes taken from `get_ready` wait in a local backlog until a slot is
/// free (`max_parallel`). From the scheduler's point of view they are
/// already dispatched.
pub struct Runtime<E: ExecutorBackend> {
    scheduler: Scheduler<NodeName>,
    commands: HashMap<NodeName, String>,
    options: RuntimeOptions,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
    backlog: VecDeque<NodeName>,
    running: usize,
    stopping: bool,
    report: RunReport,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("scheduler", &self.scheduler)
            .field("options", &self.options)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(
        scheduler: Scheduler<NodeName>,
        commands: HashMap<NodeName, String>,
        options: RuntimeOptions,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        executor: E,
    ) -> Self {
        Self {
            scheduler,
            commands,
            options: RuntimeOptions {
                max_parallel: options.max_parallel.max(1),
                ..options
            },
            event_rx,
            executor,
            backlog: VecDeque::new(),
            running: 0,
            stopping: false,
            report: RunReport::default(),
        }
    }

    /// Build a runtime for a validated manifest, taking options from its
    /// `[config]` section.
    pub fn from_graph(
        graph: &GraphFile,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        executor: E,
    ) -> Self {
        let commands = graph
            .node
            .iter()
            .filter_map(|n| n.cmd.clone().map(|cmd| (n.name.clone(), cmd)))
            .collect();
        let options = RuntimeOptions {
            max_parallel: graph.config.max_parallel,
            on_failure: graph.config.on_failure,
        };
        Self::new(graph.to_scheduler(), commands, options, event_rx, executor)
    }

    /// Main loop.
    ///
    /// - Prepares the scheduler if needed (cycles abort the run).
    /// - Moves ready batches into the backlog and starts what fits.
    /// - Waits for one event, feeds it back, repeats.
    ///
    /// Stops once nothing is running and nothing more can be started.
    pub async fn run(mut self) -> Result<RunReport> {
        if !self.scheduler.is_prepared() {
            self.scheduler.prepare()?;
        }
        info!(
            nodes = self.scheduler.len(),
            max_parallel = self.options.max_parallel,
            on_failure = ?self.options.on_failure,
            "runtime started"
        );

        loop {
            if !self.stopping {
                let batch = self.scheduler.get_ready()?;
                self.backlog.extend(batch);
                self.start_from_backlog().await?;
            }

            if self.running == 0 {
                break;
            }

            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    warn!(
                        running = self.running,
                        "runtime event channel closed with nodes in flight; exiting"
                    );
                    break;
                }
            };

            debug!(?event, "runtime received event");
            self.handle_event(event)?;
        }

        Ok(self.finish())
    }

    fn handle_event(&mut self, event: RuntimeEvent) -> Result<()> {
        match event {
            RuntimeEvent::NodeCompleted { node, outcome } => {
                self.running = self.running.saturating_sub(1);
                match outcome {
                    NodeOutcome::Success => {
                        self.scheduler.done(&node)?;
                        debug!(node = %node, "node succeeded");
                        self.report.completed.push(node);
                    }
                    NodeOutcome::Failed(code) => {
                        warn!(node = %node, exit_code = code, "node failed; its dependents will not run");
                        self.report.failed.push((node, code));
                        if self.options.on_failure == FailurePolicy::Abort && !self.stopping {
                            info!("on_failure = abort; starting no further nodes");
                            self.stopping = true;
                        }
                    }
                }
            }
            RuntimeEvent::ShutdownRequested => {
                info!(running = self.running, "shutdown requested; waiting for in-flight nodes");
                self.stopping = true;
            }
        }
        Ok(())
    }

    async fn start_from_backlog(&mut self) -> Result<()> {
        let free = self.options.max_parallel.saturating_sub(self.running);
        let take = free.min(self.backlog.len());
        if take == 0 {
            return Ok(());
        }

        let nodes: Vec<ScheduledNode> = self
            .backlog
            .drain(..take)
            .map(|name| ScheduledNode {
                cmd: self.commands.get(&name).cloned(),
                name,
            })
            .collect();

        let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        debug!(?names, backlog = self.backlog.len(), "starting nodes");

        self.running += nodes.len();
        self.executor.spawn_ready(nodes).await
    }

    fn finish(self) -> RunReport {
        let mut report = self.report;
        report.skipped = {
            let failed: HashSet<&str> = report.failed.iter().map(|(n, _)| n.as_str()).collect();
            self.scheduler
                .pending_nodes()
                .into_iter()
                .filter(|n| !failed.contains(n.as_str()))
                .collect()
        };

        info!(
            completed = report.completed.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "run finished"
        );
        report
    }
}
