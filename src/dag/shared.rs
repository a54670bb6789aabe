// src/dag/shared.rs

//! Thread-safe handle for driving one [`Scheduler`] from several workers.

use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dag::node_state::NodeState;
use crate::dag::scheduler::Scheduler;
use crate::errors::ScheduleError;

/// Cloneable handle around a scheduler guarded by a single mutex.
///
/// `get_ready` and `done` are serialised by the lock, so a node is never
/// handed out before every predecessor's `done` has been fully applied.
/// Critical sections are O(batch size) and O(out-degree) respectively.
///
/// Waiting for work is left to the caller: an empty batch while
/// [`SharedScheduler::is_active`] is `true` means "some other worker still
/// holds an in-flight node".
pub struct SharedScheduler<N> {
    inner: Arc<Mutex<Scheduler<N>>>,
}

impl<N> Clone for SharedScheduler<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for SharedScheduler<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedScheduler")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<N> From<Scheduler<N>> for SharedScheduler<N> {
    fn from(scheduler: Scheduler<N>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(scheduler)),
        }
    }
}

impl<N> SharedScheduler<N>
where
    N: Eq + Hash + Clone + fmt::Debug,
{
    pub fn new() -> Self {
        Scheduler::new().into()
    }

    pub fn add<I>(&self, node: N, predecessors: I) -> Result<(), ScheduleError<N>>
    where
        I: IntoIterator<Item = N>,
    {
        self.lock().add(node, predecessors)
    }

    pub fn prepare(&self) -> Result<(), ScheduleError<N>> {
        self.lock().prepare()
    }

    pub fn get_ready(&self) -> Result<Vec<N>, ScheduleError<N>> {
        self.lock().get_ready()
    }

    pub fn done(&self, node: &N) -> Result<(), ScheduleError<N>> {
        self.lock().done(node)
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_active()
    }

    pub fn state_of(&self, node: &N) -> Option<NodeState> {
        self.lock().state_of(node)
    }

    /// Run `f` with exclusive access to the scheduler.
    ///
    /// Use this to combine several calls into one atomic step.
    pub fn with<R>(&self, f: impl FnOnce(&mut Scheduler<N>) -> R) -> R {
        f(&mut self.lock())
    }

    // Every scheduler mutation either completes or returns an error before
    // touching state, so a poisoned lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, Scheduler<N>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<N> Default for SharedScheduler<N>
where
    N: Eq + Hash + Clone + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
