// src/errors.rs

//! Crate-wide error types.
//!
//! - [`ScheduleError`] is the scheduler's own taxonomy, generic over the
//!   node key so callers get their keys back (e.g. the cycle path).
//! - [`ToposchedError`] is used by the outer layers (config, engine, CLI).

use thiserror::Error;

use crate::dag::NodeState;

/// Errors raised by [`crate::dag::Scheduler`].
///
/// There are two classes:
/// - topology errors ([`ScheduleError::Cycle`]): the graph itself is invalid
///   and a new scheduler must be built from corrected input;
/// - protocol misuse (everything else): the caller invoked the API out of
///   sequence. These are never retried or ignored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError<N> {
    /// The graph contains a cycle. `path` starts and ends at the same node
    /// and follows predecessor edges.
    #[error("cycle detected in dependency graph: {path:?}")]
    Cycle { path: Vec<N> },

    #[error("cannot add node {node:?}: graph is frozen once prepare() has run")]
    GraphFrozen { node: N },

    #[error("prepare() was already called on this scheduler")]
    AlreadyPrepared,

    #[error("prepare() must be called before scheduling")]
    NotPrepared,

    #[error("node {node:?} is {state}, expected it to be dispatched")]
    InvalidState { node: N, state: NodeState },

    #[error("unknown node {node:?}")]
    UnknownNode { node: N },
}

impl<N> ScheduleError<N> {
    /// `true` for errors caused by the shape of the graph.
    pub fn is_topology_error(&self) -> bool {
        matches!(self, ScheduleError::Cycle { .. })
    }

    /// `true` for errors caused by calling the API out of sequence.
    pub fn is_misuse(&self) -> bool {
        !self.is_topology_error()
    }

    /// The cycle path, if this is a [`ScheduleError::Cycle`].
    pub fn cycle_path(&self) -> Option<&[N]> {
        match self {
            ScheduleError::Cycle { path } => Some(path),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ToposchedError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Schedule(#[from] ScheduleError<String>),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ToposchedError>;
