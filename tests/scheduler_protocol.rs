// tests/scheduler_protocol.rs

mod common;
use crate::common::{drain_batches, init_tracing};

use toposched::dag::{NodeState, Scheduler};
use toposched::errors::ScheduleError;

/// 1 <- 2, 1 <- 3
fn fan_out() -> Scheduler<i32> {
    let mut sched = Scheduler::new();
    sched.add(1, []).unwrap();
    sched.add(2, [1]).unwrap();
    sched.add(3, [1]).unwrap();
    sched
}

#[test]
fn dynamic_run_releases_dependents_after_done() {
    init_tracing();
    let mut sched = fan_out();
    sched.prepare().unwrap();

    assert_eq!(sched.get_ready().unwrap(), vec![1]);
    assert!(sched.get_ready().unwrap().is_empty());

    sched.done(&1).unwrap();
    assert_eq!(sched.get_ready().unwrap(), vec![2, 3]);
    assert!(sched.is_active());

    sched.done(&2).unwrap();
    sched.done(&3).unwrap();
    assert!(!sched.is_active());
    assert!(sched.get_ready().unwrap().is_empty());
}

#[test]
fn node_states_follow_lifecycle() {
    init_tracing();
    let mut sched = fan_out();
    assert_eq!(sched.state_of(&2), Some(NodeState::New));

    sched.prepare().unwrap();
    assert_eq!(sched.state_of(&1), Some(NodeState::Ready));
    assert_eq!(sched.state_of(&2), Some(NodeState::New));
    assert_eq!(sched.remaining_of(&2), Some(1));

    sched.get_ready().unwrap();
    assert_eq!(sched.state_of(&1), Some(NodeState::Dispatched));
    assert_eq!(sched.dispatched_count(), 1);

    sched.done(&1).unwrap();
    assert_eq!(sched.state_of(&1), Some(NodeState::Done));
    assert_eq!(sched.state_of(&2), Some(NodeState::Ready));
    assert_eq!(sched.remaining_of(&2), Some(0));
    assert_eq!(sched.done_count(), 1);
    assert_eq!(sched.dispatched_count(), 0);
    assert_eq!(sched.state_of(&42), None);
}

#[test]
fn successor_waits_for_all_predecessors() {
    init_tracing();
    let mut sched = Scheduler::new();
    sched.add("c", ["a", "b"]).unwrap();
    sched.prepare().unwrap();

    assert_eq!(sched.get_ready().unwrap(), vec!["a", "b"]);
    sched.done(&"a").unwrap();
    assert!(sched.get_ready().unwrap().is_empty());
    assert_eq!(sched.pending_nodes(), vec!["c", "b"]);

    sched.done(&"b").unwrap();
    assert_eq!(sched.get_ready().unwrap(), vec!["c"]);
}

#[test]
fn newly_ready_nodes_join_the_next_batch_in_insertion_order() {
    init_tracing();
    let mut sched = Scheduler::new();
    sched.add("late", ["slow"]).unwrap();
    sched.add("slow", []).unwrap();
    sched.add("fast", []).unwrap();
    sched.add("early", ["fast"]).unwrap();
    sched.prepare().unwrap();

    assert_eq!(sched.get_ready().unwrap(), vec!["slow", "fast"]);
    sched.done(&"fast").unwrap();
    sched.done(&"slow").unwrap();
    // "late" was inserted before "early", so it comes first despite being
    // released second.
    assert_eq!(sched.get_ready().unwrap(), vec!["late", "early"]);
}

#[test]
fn add_is_cumulative_and_creates_predecessors() {
    let mut sched = Scheduler::new();
    sched.add("d", ["b"]).unwrap();
    sched.add("d", ["c"]).unwrap();
    sched.add("d", ["b"]).unwrap();

    assert_eq!(sched.len(), 3);
    assert!(sched.contains(&"b"));
    assert_eq!(sched.predecessors_of(&"d"), Some(vec!["b", "c"]));
    assert_eq!(sched.successors_of(&"b"), Some(vec!["d"]));
    assert_eq!(sched.predecessors_of(&"b"), Some(vec![]));
    assert_eq!(sched.nodes().copied().collect::<Vec<_>>(), vec!["d", "b", "c"]);
}

#[test]
fn duplicate_predecessor_counts_once() {
    let mut sched = Scheduler::new();
    sched.add("b", ["a", "a"]).unwrap();
    sched.prepare().unwrap();
    let batches = drain_batches(&mut sched);
    assert_eq!(batches, vec![vec!["a"], vec!["b"]]);
}

#[test]
fn empty_graph_is_never_active() {
    let mut sched: Scheduler<u32> = Scheduler::new();
    assert!(!sched.is_active());
    sched.prepare().unwrap();
    assert!(!sched.is_active());
    assert!(sched.get_ready().unwrap().is_empty());
}

#[test]
fn done_on_unknown_node_fails() {
    init_tracing();
    let mut sched = fan_out();
    sched.prepare().unwrap();
    assert_eq!(sched.done(&7), Err(ScheduleError::UnknownNode { node: 7 }));
}

#[test]
fn get_ready_before_prepare_fails() {
    let mut sched = fan_out();
    assert!(sched.is_active());
    assert_eq!(sched.get_ready(), Err(ScheduleError::NotPrepared));
    assert_eq!(sched.done(&1), Err(ScheduleError::NotPrepared));
}

#[test]
fn done_twice_is_rejected() {
    init_tracing();
    let mut sched = fan_out();
    sched.prepare().unwrap();
    sched.get_ready().unwrap();
    sched.done(&1).unwrap();

    let err = sched.done(&1).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::InvalidState {
            node: 1,
            state: NodeState::Done
        }
    );
    assert!(err.is_misuse());
}

#[test]
fn done_before_dispatch_is_rejected() {
    let mut sched = fan_out();
    sched.prepare().unwrap();

    assert_eq!(
        sched.done(&1),
        Err(ScheduleError::InvalidState {
            node: 1,
            state: NodeState::Ready
        })
    );
    assert_eq!(
        sched.done(&2),
        Err(ScheduleError::InvalidState {
            node: 2,
            state: NodeState::New
        })
    );
    // The rejected calls changed nothing.
    assert_eq!(sched.get_ready().unwrap(), vec![1]);
}

#[test]
fn graph_is_frozen_after_prepare() {
    let mut sched = fan_out();
    sched.prepare().unwrap();

    assert_eq!(
        sched.add(4, [1]),
        Err(ScheduleError::GraphFrozen { node: 4 })
    );
    assert!(!sched.contains(&4));
    assert_eq!(sched.prepare(), Err(ScheduleError::AlreadyPrepared));
}

#[test]
fn error_messages_name_the_node() {
    let err: ScheduleError<&str> = ScheduleError::UnknownNode { node: "ghost" };
    assert!(err.to_string().contains("ghost"));

    let err: ScheduleError<&str> = ScheduleError::InvalidState {
        node: "a",
        state: NodeState::Done,
    };
    let msg = err.to_string();
    assert!(msg.contains("\"a\""));
    assert!(msg.contains("done"));
}
