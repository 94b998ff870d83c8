//! Directly-follows graph
//!
//! Counts how often one activity is immediately followed by another,
//! together with start and end activities of the traces.

use std::collections::BTreeMap;

/// Directly-follows graph of a (sub-)log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dfg {
    pub activities: BTreeMap<String, u64>,
    pub edges: BTreeMap<(String, String), u64>,
    pub start: BTreeMap<String, u64>,
    pub end: BTreeMap<String, u64>,
    pub trace_count: u64,
}

impl Dfg {
    pub fn from_traces(traces: &[Vec<String>]) -> Self {
        let mut dfg = Dfg::default();

        for trace in traces {
            dfg.trace_count += 1;

            let (Some(first), Some(last)) = (trace.first(), trace.last()) else {
                continue;
            };

            *dfg.start.entry(first.clone()).or_default() += 1;
            *dfg.end.entry(last.clone()).or_default() += 1;

            for activity in trace {
                *dfg.activities.entry(activity.clone()).or_default() += 1;
            }

            for pair in trace.windows(2) {
                *dfg
                    .edges
                    .entry((pair[0].clone(), pair[1].clone()))
                    .or_default() += 1;
            }
        }

        dfg
    }

    pub fn is_start(&self, activity: &str) -> bool {
        self.start.contains_key(activity)
    }

    pub fn is_end(&self, activity: &str) -> bool {
        self.end.contains_key(activity)
    }
}
