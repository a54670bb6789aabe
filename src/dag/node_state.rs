// src/dag/node_state.rs

//! Per-node scheduling state.

use std::fmt;

/// Lifecycle of a node during one scheduling run.
///
/// Transitions only move forward:
/// `New -> Ready -> Dispatched -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeState {
    /// Registered, still waiting on at least one predecessor (or not prepared yet).
    #[default]
    New,
    /// All predecessors are done; waiting to be handed out by `get_ready`.
    Ready,
    /// Returned by `get_ready`; waiting for the caller to report `done`.
    Dispatched,
    /// Completed.
    Done,
}

impl NodeState {
    pub fn is_done(self) -> bool {
        matches!(self, NodeState::Done)
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeState::New => "new",
            NodeState::Ready => "ready",
            NodeState::Dispatched => "dispatched",
            NodeState::Done => "done",
        };
        f.write_str(s)
    }
}
