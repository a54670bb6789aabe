// src/dag/graph.rs

use std::collections::HashMap;
use std::hash::Hash;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

/// Node registry: canonical node identities plus their dependency edges.
///
/// Nodes live in a `petgraph` arena, so after registration every lookup is
/// an index access. The arena index doubles as the insertion index that the
/// scheduler uses for tie-breaking.
///
/// Edge direction: predecessor -> node. For `add(B, [A])` we store `A -> B`.
#[derive(Debug, Clone)]
pub struct DepGraph<N> {
    graph: DiGraph<N, ()>,
    index: HashMap<N, NodeIndex>,
}

impl<N> Default for DepGraph<N> {
    fn default() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }
}

impl<N: Eq + Hash + Clone> DepGraph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `key`, registering it first if unseen.
    pub fn ensure_node(&mut self, key: N) -> NodeIndex {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(key.clone());
        self.index.insert(key, idx);
        idx
    }

    /// Record that `pred` must complete before `node`.
    ///
    /// Adding the same edge twice is a no-op.
    pub fn add_edge(&mut self, pred: NodeIndex, node: NodeIndex) {
        self.graph.update_edge(pred, node, ());
    }

    pub fn index_of(&self, key: &N) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    pub fn contains(&self, key: &N) -> bool {
        self.index.contains_key(key)
    }

    /// Key of a registered node.
    ///
    /// Panics if `idx` did not come from this graph.
    pub fn key(&self, idx: NodeIndex) -> &N {
        &self.graph[idx]
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All node indices in insertion order.
    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// All keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &N> + '_ {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Immediate predecessors of `idx` (no particular order).
    pub fn predecessors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Incoming)
    }

    /// Immediate successors of `idx` (no particular order).
    pub fn successors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Outgoing)
    }

    /// Number of immediate predecessors.
    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.predecessors(idx).count()
    }

    /// Predecessor keys of `key`, in insertion order. `None` if unknown.
    pub fn predecessor_keys(&self, key: &N) -> Option<Vec<N>> {
        let idx = self.index_of(key)?;
        Some(self.sorted_keys(self.predecessors(idx)))
    }

    /// Successor keys of `key`, in insertion order. `None` if unknown.
    pub fn successor_keys(&self, key: &N) -> Option<Vec<N>> {
        let idx = self.index_of(key)?;
        Some(self.sorted_keys(self.successors(idx)))
    }

    fn sorted_keys(&self, indices: impl Iterator<Item = NodeIndex>) -> Vec<N> {
        let mut indices: Vec<NodeIndex> = indices.collect();
        indices.sort_unstable();
        indices.into_iter().map(|i| self.graph[i].clone()).collect()
    }
}
