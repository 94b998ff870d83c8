//! Event log domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A single recorded event of a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub activity: String,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

impl Event {
    pub fn new(activity: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            timestamp: None,
            attributes: HashMap::new(),
        }
    }
}

/// All events recorded for one case, in execution order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub case_id: String,
    pub events: Vec<Event>,
}

impl Trace {
    pub fn new(case_id: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            events: Vec::new(),
        }
    }

    /// Orders events by timestamp when every event carries one.
    ///
    /// The sort is stable, so events sharing a timestamp keep file order.
    pub fn sort_by_timestamp(&mut self) {
        if self.events.iter().all(|e| e.timestamp.is_some()) {
            self.events.sort_by_key(|e| e.timestamp);
        }
    }

    /// Activity names of this trace in order
    pub fn activities(&self) -> Vec<String> {
        self.events.iter().map(|e| e.activity.clone()).collect()
    }
}

/// An event log: the traces of every recorded case
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    pub traces: Vec<Trace>,
}

impl EventLog {
    pub fn new(traces: Vec<Trace>) -> Self {
        Self { traces }
    }

    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    pub fn event_count(&self) -> usize {
        self.traces.iter().map(|t| t.events.len()).sum()
    }

    /// Distinct activity names, sorted
    pub fn activities(&self) -> BTreeSet<String> {
        self.traces
            .iter()
            .flat_map(|t| t.events.iter().map(|e| e.activity.clone()))
            .collect()
    }

    /// The log as plain activity sequences, one per trace
    pub fn sequences(&self) -> Vec<Vec<String>> {
        self.traces.iter().map(Trace::activities).collect()
    }
}
