//! Event log import
//!
//! Reads an uploaded log file into an [`EventLog`]. Two formats are
//! understood: CSV with a header row and JSON (nested traces or flat
//! events). The format is picked from the file extension and, failing
//! that, sniffed from the content.

mod delimited;
mod json;

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use hieragg_core::domain::event_log::{Event, EventLog, Trace};

use crate::error::{EngineError, Result};

pub use delimited::parse_csv;
pub use json::parse_json;

/// Supported log formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Csv,
    Json,
}

impl LogFormat {
    /// Picks a format from the extension, falling back to the content
    pub fn detect(path: &Path, content: &str) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") | Some("tsv") | Some("txt") => LogFormat::Csv,
            Some("json") => LogFormat::Json,
            _ => Self::sniff(content),
        }
    }

    fn sniff(content: &str) -> Self {
        match content.trim_start().chars().next() {
            Some('[') | Some('{') => LogFormat::Json,
            _ => LogFormat::Csv,
        }
    }
}

/// Reads and parses the log stored at `path`
pub fn read_log(path: &Path) -> Result<EventLog> {
    let bytes = std::fs::read(path).map_err(|e| EngineError::io(path, e))?;
    let content = String::from_utf8(bytes)
        .map_err(|_| EngineError::invalid_log("event log is not valid UTF-8"))?;
    let content = content.trim_start_matches('\u{feff}');

    let format = LogFormat::detect(path, content);
    tracing::debug!(path = %path.display(), ?format, "Importing event log");

    parse_log(content, format)
}

/// Parses log content of a known format
pub fn parse_log(content: &str, format: LogFormat) -> Result<EventLog> {
    let log = match format {
        LogFormat::Csv => parse_csv(content)?,
        LogFormat::Json => parse_json(content)?,
    };

    if log.event_count() == 0 {
        return Err(EngineError::EmptyLog);
    }

    tracing::debug!(
        traces = log.trace_count(),
        events = log.event_count(),
        "Event log imported"
    );

    Ok(log)
}

/// Parses the timestamp notations found in exported logs
///
/// Naive timestamps are taken as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%d-%m-%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
    ];

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// Groups events into traces keyed by case id
///
/// Traces keep the order in which their case id first appeared.
#[derive(Default)]
pub(crate) struct TraceBuilder {
    traces: Vec<Trace>,
    index: HashMap<String, usize>,
}

impl TraceBuilder {
    pub(crate) fn push(&mut self, case_id: &str, event: Event) {
        let idx = match self.index.get(case_id) {
            Some(idx) => *idx,
            None => {
                self.traces.push(Trace::new(case_id));
                self.index.insert(case_id.to_string(), self.traces.len() - 1);
                self.traces.len() - 1
            }
        };
        self.traces[idx].events.push(event);
    }

    /// Ensures a (possibly empty) trace exists for `case_id`
    pub(crate) fn touch(&mut self, case_id: &str) {
        if !self.index.contains_key(case_id) {
            self.traces.push(Trace::new(case_id));
            self.index.insert(case_id.to_string(), self.traces.len() - 1);
        }
    }

    pub(crate) fn finish(mut self) -> EventLog {
        for trace in &mut self.traces {
            trace.sort_by_timestamp();
        }
        EventLog::new(self.traces)
    }
}
