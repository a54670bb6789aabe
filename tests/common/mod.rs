#![allow(dead_code)]

pub use toposched_test_utils::builders;
pub use toposched_test_utils::fake_executor;
pub use toposched_test_utils::{init_tracing, with_timeout};

use toposched::dag::Scheduler;

/// Drain a prepared scheduler batch by batch, completing every node of a
/// batch before asking for the next one.
pub fn drain_batches<N>(sched: &mut Scheduler<N>) -> Vec<Vec<N>>
where
    N: Eq + std::hash::Hash + Clone + std::fmt::Debug,
{
    let mut batches = Vec::new();
    while sched.is_active() {
        let batch = sched.get_ready().expect("get_ready on prepared scheduler");
        assert!(!batch.is_empty(), "active scheduler with nothing in flight returned no work");
        for n in &batch {
            sched.done(n).expect("done on dispatched node");
        }
        batches.push(batch);
    }
    batches
}

/// Assert that `path` is a closed walk along predecessor edges.
pub fn assert_cycle_path<N>(sched: &Scheduler<N>, path: &[N])
where
    N: Eq + std::hash::Hash + Clone + std::fmt::Debug,
{
    assert!(path.len() >= 2, "cycle path too short: {path:?}");
    assert_eq!(path.first(), path.last(), "cycle must start and end at the same node");
    for pair in path.windows(2) {
        let preds = sched.predecessors_of(&pair[0]).expect("cycle node is registered");
        assert!(
            preds.contains(&pair[1]),
            "{:?} is not a predecessor of {:?} in {path:?}",
            pair[1],
            pair[0]
        );
    }
}
