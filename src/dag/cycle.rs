// src/dag/cycle.rs

//! Cycle detection for a frozen [`DepGraph`].

use std::collections::VecDeque;
use std::hash::Hash;

use petgraph::graph::NodeIndex;
use tracing::{debug, trace};

use crate::dag::graph::DepGraph;

/// Find one concrete cycle in `graph`, or `None` if it is acyclic.
///
/// Nodes that cannot be resolved by a Kahn pass are exactly the nodes on, or
/// downstream of, a cycle; every such node has at least one unresolved
/// predecessor. Starting from the unresolved node with the lowest insertion
/// index we keep following the lowest-index unresolved predecessor until a
/// node repeats. The repeated section is a cycle.
///
/// The returned path follows predecessor edges, is rotated so that it starts
/// at the cycle member with the lowest insertion index, and ends with that
/// same node again (`[X, Y, Z, X]`, or `[A, A]` for a self-loop).
pub fn find_cycle<N: Eq + Hash + Clone>(graph: &DepGraph<N>) -> Option<Vec<NodeIndex>> {
    let resolved = kahn_resolved(graph);

    let start = graph.indices().find(|idx| !resolved[idx.index()])?;
    trace!(start = start.index(), "unresolved nodes remain; walking predecessors");

    let mut position: Vec<Option<usize>> = vec![None; graph.len()];
    let mut walk: Vec<NodeIndex> = Vec::new();
    let mut cur = start;

    let cycle_start = loop {
        if let Some(p) = position[cur.index()] {
            break p;
        }
        position[cur.index()] = Some(walk.len());
        walk.push(cur);

        // Every unresolved node has an unresolved predecessor, otherwise Kahn
        // would have released it.
        cur = graph
            .predecessors(cur)
            .filter(|p| !resolved[p.index()])
            .min()?;
    };

    let mut cycle = walk.split_off(cycle_start);
    let lowest = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, idx)| **idx)
        .map(|(i, _)| i)
        .unwrap_or(0);
    cycle.rotate_left(lowest);
    cycle.push(cycle[0]);

    debug!(len = cycle.len() - 1, "cycle found");
    Some(cycle)
}

/// Run Kahn's algorithm and report which nodes it manages to resolve.
fn kahn_resolved<N: Eq + Hash + Clone>(graph: &DepGraph<N>) -> Vec<bool> {
    let mut remaining: Vec<usize> = graph.indices().map(|idx| graph.in_degree(idx)).collect();
    let mut resolved = vec![false; graph.len()];

    let mut queue: VecDeque<NodeIndex> = graph
        .indices()
        .filter(|idx| remaining[idx.index()] == 0)
        .collect();

    while let Some(idx) = queue.pop_front() {
        resolved[idx.index()] = true;
        for succ in graph.successors(idx) {
            let r = &mut remaining[succ.index()];
            *r -= 1;
            if *r == 0 {
                queue.push_back(succ);
            }
        }
    }

    resolved
}
