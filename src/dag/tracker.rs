// src/dag/tracker.rs

//! Ready-set tracking for the incremental scheduling protocol.

use std::collections::BTreeSet;
use std::hash::Hash;

use petgraph::graph::NodeIndex;
use tracing::trace;

use crate::dag::graph::DepGraph;
use crate::dag::node_state::NodeState;

/// Mutable per-run state for every node in a frozen graph.
///
/// Invariants:
/// - `remaining[i]` is the number of predecessors of `i` that are not `Done`;
/// - `ready` holds exactly the nodes in state `Ready`;
/// - a node only becomes `Done` from `Dispatched`.
#[derive(Debug, Clone)]
pub struct ReadyTracker {
    remaining: Vec<usize>,
    states: Vec<NodeState>,
    /// Ordered by insertion index, which is the batch tie-break policy.
    ready: BTreeSet<NodeIndex>,
    in_flight: usize,
    done: usize,
}

impl ReadyTracker {
    /// Compute initial counts and release every node without predecessors.
    ///
    /// The graph must already be known to be acyclic.
    pub fn new<N: Eq + Hash + Clone>(graph: &DepGraph<N>) -> Self {
        let remaining: Vec<usize> = graph.indices().map(|idx| graph.in_degree(idx)).collect();
        let mut states = vec![NodeState::New; graph.len()];
        let mut ready = BTreeSet::new();

        for idx in graph.indices() {
            if remaining[idx.index()] == 0 {
                states[idx.index()] = NodeState::Ready;
                ready.insert(idx);
            }
        }

        Self {
            remaining,
            states,
            ready,
            in_flight: 0,
            done: 0,
        }
    }

    /// Hand out every `Ready` node, marking each `Dispatched`.
    pub fn take_ready(&mut self) -> Vec<NodeIndex> {
        let batch: Vec<NodeIndex> = std::mem::take(&mut self.ready).into_iter().collect();
        for idx in &batch {
            self.states[idx.index()] = NodeState::Dispatched;
        }
        self.in_flight += batch.len();
        batch
    }

    /// Mark a dispatched node as done and release successors whose last
    /// outstanding predecessor it was.
    ///
    /// Returns the newly released nodes, or the node's current state if it
    /// was not `Dispatched`.
    pub fn mark_done<N: Eq + Hash + Clone>(
        &mut self,
        graph: &DepGraph<N>,
        idx: NodeIndex,
    ) -> Result<Vec<NodeIndex>, NodeState> {
        let state = self.states[idx.index()];
        if state != NodeState::Dispatched {
            return Err(state);
        }

        self.states[idx.index()] = NodeState::Done;
        self.in_flight -= 1;
        self.done += 1;

        let mut released = Vec::new();
        for succ in graph.successors(idx) {
            let r = &mut self.remaining[succ.index()];
            *r -= 1;
            trace!(node = succ.index(), remaining = *r, "predecessor finished");
            if *r == 0 {
                self.states[succ.index()] = NodeState::Ready;
                self.ready.insert(succ);
                released.push(succ);
            }
        }
        released.sort_unstable();
        Ok(released)
    }

    pub fn state(&self, idx: NodeIndex) -> NodeState {
        self.states[idx.index()]
    }

    pub fn remaining(&self, idx: NodeIndex) -> usize {
        self.remaining[idx.index()]
    }

    pub fn ready_count(&self) -> usize {
        self.ready.len()
    }

    /// Nodes handed out but not yet reported done.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn done_count(&self) -> usize {
        self.done
    }

    /// `true` while any node is not `Done`.
    pub fn is_active(&self) -> bool {
        self.done < self.states.len()
    }
}
