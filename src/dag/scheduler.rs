// src/dag/scheduler.rs

use std::fmt;
use std::hash::Hash;

use petgraph::graph::NodeIndex;
use tracing::{debug, info, warn};

use crate::dag::cycle::find_cycle;
use crate::dag::graph::DepGraph;
use crate::dag::node_state::NodeState;
use crate::dag::tracker::ReadyTracker;
use crate::errors::ScheduleError;

/// Where the scheduler is in its one-shot lifecycle.
#[derive(Debug, Clone)]
enum Phase {
    /// Nodes and edges may still be added.
    Building,
    /// `prepare` found a cycle. The graph is frozen and unusable.
    Broken { cycle: Vec<NodeIndex> },
    /// Frozen and acyclic; the ready-set protocol is live.
    Prepared(ReadyTracker),
}

/// Incremental topological scheduler over caller-supplied node keys.
///
/// Usage follows a fixed protocol:
///
/// 1. build the graph with [`Scheduler::add`];
/// 2. freeze it with [`Scheduler::prepare`] (rejects cycles);
/// 3. loop while [`Scheduler::is_active`]: take a batch from
///    [`Scheduler::get_ready`], run it elsewhere, report each node with
///    [`Scheduler::done`].
///
/// The scheduler never runs anything itself; it only orders keys. Batches
/// are returned in insertion order (the order in which keys were first
/// mentioned to `add`).
///
/// ```
/// use toposched::dag::Scheduler;
///
/// let mut sched = Scheduler::new();
/// sched.add("build", ["fetch"]).unwrap();
/// sched.add("test", ["build"]).unwrap();
/// assert_eq!(sched.static_order().unwrap(), vec!["fetch", "build", "test"]);
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler<N> {
    graph: DepGraph<N>,
    phase: Phase,
}

impl<N> Default for Scheduler<N> {
    fn default() -> Self {
        Self {
            graph: DepGraph::default(),
            phase: Phase::Building,
        }
    }
}

impl<N> Scheduler<N>
where
    N: Eq + Hash + Clone + fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` and record every entry of `predecessors` as a
    /// dependency of it.
    ///
    /// Unseen keys (including predecessors) are created on the fly. Repeated
    /// calls for the same node accumulate predecessors. A node listed as its
    /// own predecessor is accepted here and reported by `prepare` as a cycle.
    pub fn add<I>(&mut self, node: N, predecessors: I) -> Result<(), ScheduleError<N>>
    where
        I: IntoIterator<Item = N>,
    {
        if !matches!(self.phase, Phase::Building) {
            warn!(node = ?node, "add() called on a frozen graph");
            return Err(ScheduleError::GraphFrozen { node });
        }

        let idx = self.graph.ensure_node(node);
        for pred in predecessors {
            let pred_idx = self.graph.ensure_node(pred);
            self.graph.add_edge(pred_idx, idx);
        }
        Ok(())
    }

    /// Freeze the graph, check it for cycles and release every node that has
    /// no predecessors.
    pub fn prepare(&mut self) -> Result<(), ScheduleError<N>> {
        if !matches!(self.phase, Phase::Building) {
            return Err(ScheduleError::AlreadyPrepared);
        }

        if let Some(cycle) = find_cycle(&self.graph) {
            let path = self.keys_of(&cycle);
            warn!(?path, "dependency cycle; graph cannot be scheduled");
            self.phase = Phase::Broken { cycle };
            return Err(ScheduleError::Cycle { path });
        }

        let tracker = ReadyTracker::new(&self.graph);
        info!(
            nodes = self.graph.len(),
            edges = self.graph.edge_count(),
            ready = tracker.ready_count(),
            "scheduler prepared"
        );
        self.phase = Phase::Prepared(tracker);
        Ok(())
    }

    /// Return every node that is ready right now and mark them dispatched.
    ///
    /// An empty batch while [`Scheduler::is_active`] is `true` means the
    /// caller must wait for in-flight nodes to be reported done.
    pub fn get_ready(&mut self) -> Result<Vec<N>, ScheduleError<N>> {
        let batch = self.tracker_mut()?.take_ready();
        let keys = self.keys_of(&batch);
        if !keys.is_empty() {
            debug!(batch = ?keys, "dispatching ready batch");
        }
        Ok(keys)
    }

    /// Report that a dispatched node has finished.
    ///
    /// Successors whose last outstanding predecessor was `node` become
    /// ready immediately.
    pub fn done(&mut self, node: &N) -> Result<(), ScheduleError<N>> {
        // Split borrows: the tracker is mutated while the graph is read.
        let tracker = match &mut self.phase {
            Phase::Prepared(tracker) => tracker,
            Phase::Building => return Err(ScheduleError::NotPrepared),
            Phase::Broken { cycle } => {
                let path = cycle.iter().map(|i| self.graph.key(*i).clone()).collect();
                return Err(ScheduleError::Cycle { path });
            }
        };

        let Some(idx) = self.graph.index_of(node) else {
            warn!(node = ?node, "done() for unknown node");
            return Err(ScheduleError::UnknownNode { node: node.clone() });
        };

        match tracker.mark_done(&self.graph, idx) {
            Ok(released) => {
                debug!(
                    node = ?node,
                    released = released.len(),
                    in_flight = tracker.in_flight(),
                    "node done"
                );
                Ok(())
            }
            Err(state) => {
                warn!(node = ?node, %state, "done() for a node that is not dispatched");
                Err(ScheduleError::InvalidState {
                    node: node.clone(),
                    state,
                })
            }
        }
    }

    /// `true` while some node has not been reported done.
    ///
    /// An unprepared graph with nodes counts as active; the next
    /// `get_ready` then fails with [`ScheduleError::NotPrepared`].
    pub fn is_active(&self) -> bool {
        match &self.phase {
            Phase::Prepared(tracker) => tracker.is_active(),
            Phase::Building | Phase::Broken { .. } => !self.graph.is_empty(),
        }
    }

    /// Prepare and drain the whole graph into one topological order.
    ///
    /// When several nodes are ready at once they appear in insertion order.
    pub fn static_order(&mut self) -> Result<Vec<N>, ScheduleError<N>> {
        Ok(self.static_batches()?.into_iter().flatten().collect())
    }

    /// Prepare and drain the whole graph, keeping each ready batch separate.
    ///
    /// Batch `k` holds the nodes that become ready once every node in
    /// batches `0..k` is done, so all nodes of one batch may run in parallel.
    pub fn static_batches(&mut self) -> Result<Vec<Vec<N>>, ScheduleError<N>> {
        self.prepare()?;

        let mut batches: Vec<Vec<N>> = Vec::new();
        let Phase::Prepared(tracker) = &mut self.phase else {
            return Err(ScheduleError::NotPrepared);
        };

        loop {
            let batch = tracker.take_ready();
            if batch.is_empty() {
                break;
            }
            for idx in &batch {
                // Every node in the batch was just dispatched.
                let _ = tracker.mark_done(&self.graph, *idx);
            }
            batches.push(batch.iter().map(|i| self.graph.key(*i).clone()).collect());
        }

        debug!(batches = batches.len(), "static order extracted");
        Ok(batches)
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.graph.contains(node)
    }

    pub fn is_prepared(&self) -> bool {
        matches!(self.phase, Phase::Prepared(_))
    }

    /// All node keys in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.graph.keys()
    }

    /// Current state of `node`, or `None` if the key is unknown.
    ///
    /// Before `prepare` every node is [`NodeState::New`].
    pub fn state_of(&self, node: &N) -> Option<NodeState> {
        let idx = self.graph.index_of(node)?;
        match &self.phase {
            Phase::Prepared(tracker) => Some(tracker.state(idx)),
            Phase::Building | Phase::Broken { .. } => Some(NodeState::New),
        }
    }

    /// Number of predecessors of `node` not yet done (only after `prepare`).
    pub fn remaining_of(&self, node: &N) -> Option<usize> {
        let idx = self.graph.index_of(node)?;
        match &self.phase {
            Phase::Prepared(tracker) => Some(tracker.remaining(idx)),
            Phase::Building | Phase::Broken { .. } => None,
        }
    }

    /// Immediate predecessors of `node` in insertion order.
    pub fn predecessors_of(&self, node: &N) -> Option<Vec<N>> {
        self.graph.predecessor_keys(node)
    }

    /// Immediate successors of `node` in insertion order.
    pub fn successors_of(&self, node: &N) -> Option<Vec<N>> {
        self.graph.successor_keys(node)
    }

    /// Nodes handed out by `get_ready` and not yet reported done.
    pub fn dispatched_count(&self) -> usize {
        match &self.phase {
            Phase::Prepared(tracker) => tracker.in_flight(),
            Phase::Building | Phase::Broken { .. } => 0,
        }
    }

    pub fn done_count(&self) -> usize {
        match &self.phase {
            Phase::Prepared(tracker) => tracker.done_count(),
            Phase::Building | Phase::Broken { .. } => 0,
        }
    }

    /// Every node that is not done yet, in insertion order.
    pub fn pending_nodes(&self) -> Vec<N> {
        self.graph
            .indices()
            .filter(|idx| match &self.phase {
                Phase::Prepared(tracker) => !tracker.state(*idx).is_done(),
                Phase::Building | Phase::Broken { .. } => true,
            })
            .map(|idx| self.graph.key(idx).clone())
            .collect()
    }

    fn tracker_mut(&mut self) -> Result<&mut ReadyTracker, ScheduleError<N>> {
        match &mut self.phase {
            Phase::Prepared(tracker) => Ok(tracker),
            Phase::Building => Err(ScheduleError::NotPrepared),
            Phase::Broken { cycle } => Err(ScheduleError::Cycle {
                path: cycle.iter().map(|i| self.graph.key(*i).clone()).collect(),
            }),
        }
    }

    fn keys_of(&self, indices: &[NodeIndex]) -> Vec<N> {
        indices.iter().map(|i| self.graph.key(*i).clone()).collect()
    }
}
