// tests/static_order.rs

mod common;
use crate::common::{drain_batches, init_tracing};

use std::collections::HashMap;

use toposched::dag::Scheduler;
use toposched::errors::ScheduleError;

/// A; B, C after A; D after B and C.
fn diamond() -> Scheduler<&'static str> {
    let mut sched = Scheduler::new();
    sched.add("A", []).unwrap();
    sched.add("B", ["A"]).unwrap();
    sched.add("C", ["A"]).unwrap();
    sched.add("D", ["B", "C"]).unwrap();
    sched
}

fn assert_topological<N>(sched: &Scheduler<N>, order: &[N])
where
    N: Eq + std::hash::Hash + Clone + std::fmt::Debug,
{
    let position: HashMap<&N, usize> = order.iter().enumerate().map(|(i, n)| (n, i)).collect();
    assert_eq!(position.len(), order.len(), "order contains duplicates");
    assert_eq!(order.len(), sched.len(), "order is missing nodes");
    for node in sched.nodes() {
        for pred in sched.predecessors_of(node).unwrap() {
            assert!(
                position[&pred] < position[node],
                "{pred:?} must precede {node:?}"
            );
        }
    }
}

#[test]
fn diamond_orders_predecessors_first() {
    init_tracing();
    let mut sched = diamond();
    let order = sched.static_order().unwrap();
    assert_eq!(order, vec!["A", "B", "C", "D"]);
    assert_topological(&sched, &order);
    assert!(!sched.is_active());
}

#[test]
fn diamond_batches_group_independent_nodes() {
    let mut sched = diamond();
    assert_eq!(
        sched.static_batches().unwrap(),
        vec![vec!["A"], vec!["B", "C"], vec!["D"]]
    );
}

#[test]
fn static_batches_match_manual_drain() {
    let mut a = diamond();
    let mut b = diamond();
    b.prepare().unwrap();
    assert_eq!(a.static_batches().unwrap(), drain_batches(&mut b));
}

#[test]
fn ties_break_by_first_mention() {
    let mut sched = Scheduler::new();
    sched.add("z", ["b", "a"]).unwrap();
    assert_eq!(sched.static_order().unwrap(), vec!["b", "a", "z"]);
}

#[test]
fn static_order_is_reproducible() {
    let build = || {
        let mut sched = Scheduler::new();
        for i in (0..200u32).rev() {
            sched.add(i, (0..i).filter(|j| (i * 31 + j) % 7 == 0)).unwrap();
        }
        sched
    };

    let first = build().static_order().unwrap();
    assert_topological(&build(), &first);
    assert_eq!(build().static_order().unwrap(), first);
}

#[test]
fn long_chain() {
    let mut sched = Scheduler::new();
    for i in 1..10_000u32 {
        sched.add(i, [i - 1]).unwrap();
    }
    let order = sched.static_order().unwrap();
    assert_eq!(order, (0..10_000u32).collect::<Vec<_>>());
}

#[test]
fn empty_graph_has_empty_order() {
    let mut sched: Scheduler<String> = Scheduler::new();
    assert!(sched.static_order().unwrap().is_empty());
}

#[test]
fn static_order_prepares_itself() {
    let mut sched = diamond();
    sched.prepare().unwrap();
    assert_eq!(sched.static_order(), Err(ScheduleError::AlreadyPrepared));
}
