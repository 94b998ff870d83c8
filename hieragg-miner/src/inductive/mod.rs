//! Process tree discovery
//!
//! Inductive-miner style recursion: find a cut in the directly-follows
//! graph of the current sub-log, split the sub-log along it and recurse.
//! When no cut applies a fall-through produces a model that still fits
//! every trace.

mod cuts;
mod split;

use std::collections::BTreeSet;

use hieragg_core::domain::event_log::EventLog;
use hieragg_core::domain::tree::{Operator, ProcessTree};

use crate::dfg::Dfg;

pub use cuts::{Cut, find_cut};
pub use split::split_log;

/// Guard against runaway recursion on degenerate logs
const MAX_DEPTH: usize = 128;

/// Discovers a process tree for an event log
pub fn discover_tree(log: &EventLog) -> ProcessTree {
    let traces = log.sequences();
    let tree = mine(&traces, 0);
    tracing::debug!(tree = %tree.notation(), "Process tree discovered");
    tree
}

/// Discovers a process tree for plain activity sequences
pub fn discover_tree_from_traces(traces: &[Vec<String>]) -> ProcessTree {
    mine(traces, 0)
}

fn event_count(traces: &[Vec<String>]) -> u64 {
    traces.iter().map(|t| t.len() as u64).sum()
}

fn mine(traces: &[Vec<String>], depth: usize) -> ProcessTree {
    let events = event_count(traces);

    // Base cases
    if events == 0 {
        return ProcessTree::tau(traces.len() as u64);
    }

    let activities: BTreeSet<&str> = traces.iter().flatten().map(String::as_str).collect();

    let empty = traces.iter().filter(|t| t.is_empty()).count();
    if empty > 0 {
        let non_empty: Vec<Vec<String>> =
            traces.iter().filter(|t| !t.is_empty()).cloned().collect();
        return ProcessTree::operator(
            Operator::Xor,
            events,
            vec![ProcessTree::tau(empty as u64), mine(&non_empty, depth + 1)],
        );
    }

    if activities.len() == 1 {
        let label = activities.iter().next().copied().unwrap_or_default();
        if traces.iter().all(|t| t.len() == 1) {
            return ProcessTree::activity(label, events);
        }
        // Single activity repeated: a, aa, aaa, ...
        return ProcessTree::operator(
            Operator::Loop,
            events,
            vec![
                ProcessTree::activity(label, events),
                ProcessTree::tau(events - traces.len() as u64),
            ],
        );
    }

    if depth < MAX_DEPTH {
        let dfg = Dfg::from_traces(traces);
        if let Some(cut) = find_cut(&dfg) {
            tracing::trace!(
                operator = %cut.operator,
                parts = cut.parts.len(),
                traces = dfg.trace_count,
                "Cut found"
            );
            let children = split_log(&cut, traces)
                .iter()
                .map(|sub| mine(sub, depth + 1))
                .collect();
            return ProcessTree::operator(cut.operator, events, children);
        }
    }

    flower(traces, &activities, events)
}

/// Fall-through model allowing any sequence over the activities
fn flower(traces: &[Vec<String>], activities: &BTreeSet<&str>, events: u64) -> ProcessTree {
    tracing::debug!(activities = activities.len(), "No cut found, using flower model");

    let choices = activities
        .iter()
        .map(|a| {
            let count = traces.iter().flatten().filter(|e| e.as_str() == *a).count() as u64;
            ProcessTree::activity(*a, count)
        })
        .collect();

    ProcessTree::operator(
        Operator::Loop,
        events,
        vec![
            ProcessTree::tau(traces.len() as u64),
            ProcessTree::operator(Operator::Xor, events, choices),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traces(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|t| t.iter().map(|a| a.to_string()).collect())
            .collect()
    }

    fn notation(raw: &[&[&str]]) -> String {
        discover_tree_from_traces(&traces(raw)).notation()
    }

    #[test]
    fn test_sequence() {
        assert_eq!(notation(&[&["a", "b", "c"], &["a", "b", "c"]]), "→(a, b, c)");
    }

    #[test]
    fn test_exclusive_choice() {
        assert_eq!(notation(&[&["a", "b"], &["a", "c"]]), "→(a, ×(b, c))");
    }

    #[test]
    fn test_parallel() {
        assert_eq!(notation(&[&["a", "b"], &["b", "a"]]), "∧(a, b)");
    }

    #[test]
    fn test_loop() {
        assert_eq!(notation(&[&["a", "b", "a"], &["a"]]), "↺(a, b)");
    }

    #[test]
    fn test_optional_activity() {
        assert_eq!(notation(&[&["a", "b", "c"], &["a", "c"]]), "→(a, ×(τ, b), c)");
    }

    #[test]
    fn test_empty_traces_put_tau_first() {
        let tree = discover_tree_from_traces(&traces(&[&["a"], &[], &["a"]]));
        assert_eq!(tree.notation(), "×(τ, a)");
        match tree {
            ProcessTree::Operator { children, .. } => {
                assert_eq!(children[0], ProcessTree::tau(1));
                assert_eq!(children[1], ProcessTree::activity("a", 2));
            }
            other => panic!("expected operator, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_single_activity() {
        assert_eq!(notation(&[&["a", "a"], &["a"]]), "↺(a, τ)");
    }

    #[test]
    fn test_empty_log_is_tau() {
        assert_eq!(notation(&[&[]]), "τ");
    }

    #[test]
    fn test_frequencies() {
        let tree = discover_tree_from_traces(&traces(&[&["a", "b"], &["a", "c"], &["a", "b"]]));
        assert_eq!(tree.frequency(), 6);
        match tree {
            ProcessTree::Operator { children, .. } => {
                assert_eq!(children[0], ProcessTree::activity("a", 3));
                assert_eq!(children[1].frequency(), 3);
            }
            other => panic!("expected operator, got {:?}", other),
        }
    }

    #[test]
    fn test_discovered_tree_is_deterministic() {
        let raw: &[&[&str]] = &[&["x", "y", "z"], &["x", "z", "y"], &["w"]];
        assert_eq!(notation(raw), notation(raw));
    }
}
