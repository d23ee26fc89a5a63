//! Property-based tests for the task registry.
//!
//! Uses proptest to drive a `TaskRegistry` through random operation
//! sequences and verify after every step:
//! 1. Ids handed out by successful adds strictly increase.
//! 2. The counters agree with the task set (`in_progress + completed == len`).
//! 3. Every handle in the queue and priority structures names a live task,
//!    and the stack holds exactly the live tasks, newest on top.
//! 4. The priority structure stays in `(rank, id)` order.
//! 5. Undoing until empty yields the live tasks newest first.
//! 6. Each processed task was pending, so it adds exactly one completion.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use proptest::prelude::*;
use tasktrack::registry::{SortMode, Stats, TaskRegistry};
use tasktrack_core::{Priority, TaskId};

#[derive(Debug, Clone)]
enum Op {
    Add { priority: Priority, valid: bool },
    Complete(u64),
    Remove(u64),
    DequeueNextArrival,
    DequeueMostUrgent,
    ProcessNextArrival,
    ProcessMostUrgent,
    Undo,
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::High),
        Just(Priority::Medium),
        Just(Priority::Low),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (arb_priority(), prop::bool::weighted(0.9))
            .prop_map(|(priority, valid)| Op::Add { priority, valid }),
        1 => (1u64..30).prop_map(Op::Complete),
        1 => (1u64..30).prop_map(Op::Remove),
        1 => Just(Op::DequeueNextArrival),
        1 => Just(Op::DequeueMostUrgent),
        1 => Just(Op::ProcessNextArrival),
        1 => Just(Op::ProcessMostUrgent),
        1 => Just(Op::Undo),
    ]
}

fn apply(reg: &mut TaskRegistry, op: &Op, last_id: &mut Option<TaskId>) {
    match op {
        Op::Add { priority, valid } => {
            let name = if *valid { "task" } else { "" };
            match reg.add_task(name, "desc", "2099-01-01", *priority) {
                Ok(task) => {
                    assert!(*valid);
                    if let Some(prev) = *last_id {
                        assert!(task.id > prev, "id {} not after {}", task.id, prev);
                    }
                    *last_id = Some(task.id);
                }
                Err(_) => assert!(!*valid),
            }
        }
        Op::Complete(raw) => {
            let id = TaskId::new(*raw);
            let existed = reg.get(id).is_some();
            assert_eq!(reg.complete_task(id).is_ok(), existed);
        }
        Op::Remove(raw) => {
            let id = TaskId::new(*raw);
            let existed = reg.get(id).is_some();
            assert_eq!(reg.remove_task(id).is_some(), existed);
            assert!(reg.get(id).is_none());
        }
        Op::DequeueNextArrival => {
            reg.dequeue_next_arrival();
        }
        Op::DequeueMostUrgent => {
            reg.dequeue_most_urgent();
        }
        Op::ProcessNextArrival => {
            let before = reg.stats().completed;
            if let Some(task) = reg.process_next_arrival() {
                assert!(task.is_completed());
                assert_eq!(reg.stats().completed, before + 1);
            }
        }
        Op::ProcessMostUrgent => {
            let before = reg.stats().completed;
            if let Some(task) = reg.process_most_urgent() {
                assert!(task.is_completed());
                assert_eq!(reg.stats().completed, before + 1);
            }
        }
        Op::Undo => {
            if let Some(task) = reg.undo_last_added() {
                assert!(reg.get(task.id).is_none());
            }
        }
    }
}

fn check_invariants(reg: &TaskRegistry) {
    let stats = reg.stats();
    let pending = reg.tasks().filter(|t| t.is_pending()).count();
    assert_eq!(stats.in_progress + stats.completed, reg.len());
    assert_eq!(stats.pending, pending);
    assert_eq!(stats.in_progress, pending);
    assert_eq!(reg.reorder_by(SortMode::Stack).len(), pending);

    let live: BTreeSet<TaskId> = reg.tasks().map(|t| t.id).collect();
    for id in reg.queue_ids().iter().chain(reg.priority_ids().iter()) {
        assert!(live.contains(id), "structure holds dead handle {id}");
    }

    let stack = reg.stack_ids();
    assert!(stack.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(stack.iter().copied().collect::<BTreeSet<_>>(), live);

    let keys: Vec<(u8, TaskId)> = reg
        .priority_ids()
        .iter()
        .map(|id| (reg.get(*id).unwrap().priority.rank(), *id))
        .collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

proptest! {
    #[test]
    fn invariants_hold_under_random_ops(ops in prop::collection::vec(arb_op(), 0..80)) {
        let mut reg = TaskRegistry::new();
        let mut last_id = None;
        for op in &ops {
            apply(&mut reg, op, &mut last_id);
            check_invariants(&reg);
        }
    }

    #[test]
    fn undo_drains_newest_first(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut reg = TaskRegistry::new();
        let mut last_id = None;
        for op in &ops {
            apply(&mut reg, op, &mut last_id);
        }

        let expected: Vec<TaskId> = reg.tasks().map(|t| t.id).collect();
        let mut undone = Vec::new();
        while let Some(task) = reg.undo_last_added() {
            undone.push(task.id);
        }
        prop_assert_eq!(&undone, &expected);
        prop_assert!(reg.is_empty());
        prop_assert_eq!(reg.stats(), Stats::default());
    }

    #[test]
    fn priority_view_is_stable_sort_of_pending(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut reg = TaskRegistry::new();
        let mut last_id = None;
        for op in &ops {
            apply(&mut reg, op, &mut last_id);
        }

        let view: Vec<(u8, TaskId)> = reg
            .reorder_by(SortMode::Priority)
            .iter()
            .map(|t| (t.priority.rank(), t.id))
            .collect();
        let mut sorted = view.clone();
        sorted.sort_unstable();
        prop_assert_eq!(view, sorted);
    }
}
