//! CSV event log import

use std::collections::HashMap;

use hieragg_core::domain::event_log::{Event, EventLog};

use super::{TraceBuilder, parse_timestamp};
use crate::error::{EngineError, Result};

const CASE_COLUMNS: [&str; 5] = ["case:concept:name", "case_id", "caseid", "case id", "case"];
const ACTIVITY_COLUMNS: [&str; 5] = [
    "concept:name",
    "activity",
    "activity_name",
    "activity name",
    "event",
];
const TIMESTAMP_COLUMNS: [&str; 4] = ["time:timestamp", "timestamp", "start_timestamp", "time"];

/// Resolved column positions of a CSV header
#[derive(Debug)]
struct Columns {
    case: usize,
    activity: usize,
    timestamp: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();

        let find = |candidates: &[&str]| {
            candidates
                .iter()
                .find_map(|c| normalized.iter().position(|h| h == c))
        };

        let case = find(&CASE_COLUMNS).ok_or_else(|| {
            EngineError::invalid_log(format!(
                "no case id column found (expected one of: {})",
                CASE_COLUMNS.join(", ")
            ))
        })?;
        let activity = find(&ACTIVITY_COLUMNS).ok_or_else(|| {
            EngineError::invalid_log(format!(
                "no activity column found (expected one of: {})",
                ACTIVITY_COLUMNS.join(", ")
            ))
        })?;

        if case == activity {
            return Err(EngineError::invalid_log(
                "case id and activity must be different columns",
            ));
        }

        Ok(Self {
            case,
            activity,
            timestamp: find(&TIMESTAMP_COLUMNS),
        })
    }
}

/// Guesses the delimiter from the header line
fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    [b',', b';', b'\t', b'|']
        .into_iter()
        .max_by_key(|d| header.bytes().filter(|b| b == d).count())
        .filter(|d| header.as_bytes().contains(d))
        .unwrap_or(b',')
}

/// Parses a CSV log with a header row
pub fn parse_csv(content: &str) -> Result<EventLog> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(content))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = Columns::resolve(&headers)?;

    let mut builder = TraceBuilder::default();
    let mut unparsed_timestamps = 0usize;

    for (row, record) in reader.records().enumerate() {
        let record = record?;

        let case_id = record.get(columns.case).unwrap_or_default();
        if case_id.is_empty() {
            return Err(EngineError::invalid_log(format!(
                "row {}: missing case id",
                row + 2
            )));
        }

        let activity = record.get(columns.activity).unwrap_or_default();
        if activity.is_empty() {
            continue;
        }

        let timestamp = match columns.timestamp.and_then(|i| record.get(i)) {
            Some(raw) if !raw.is_empty() => {
                let ts = parse_timestamp(raw);
                if ts.is_none() {
                    unparsed_timestamps += 1;
                }
                ts
            }
            _ => None,
        };

        let attributes: HashMap<String, String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                *i != columns.case && *i != columns.activity && Some(*i) != columns.timestamp
            })
            .filter_map(|(i, name)| {
                record
                    .get(i)
                    .filter(|v| !v.is_empty())
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect();

        builder.push(
            case_id,
            Event {
                activity: activity.to_string(),
                timestamp,
                attributes,
            },
        );
    }

    if unparsed_timestamps > 0 {
        tracing::warn!(
            count = unparsed_timestamps,
            "Unrecognised timestamps; affected traces keep file order"
        );
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_csv() {
        let content = "case_id,activity,timestamp,resource\n\
                       1,register,2024-01-01 10:00:00,ann\n\
                       2,register,2024-01-01 09:00:00,bob\n\
                       1,approve,2024-01-01 11:00:00,ann\n";
        let log = parse_csv(content).unwrap();

        assert_eq!(log.trace_count(), 2);
        assert_eq!(log.traces[0].case_id, "1");
        assert_eq!(log.traces[0].activities(), vec!["register", "approve"]);
        assert_eq!(
            log.traces[0].events[0].attributes.get("resource"),
            Some(&"ann".to_string())
        );
    }

    #[test]
    fn test_events_sorted_by_timestamp() {
        let content = "case:concept:name,concept:name,time:timestamp\n\
                       c1,b,2024-01-01T10:00:00Z\n\
                       c1,a,2024-01-01T09:00:00Z\n";
        let log = parse_csv(content).unwrap();
        assert_eq!(log.traces[0].activities(), vec!["a", "b"]);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let content = "Case;Activity\nx;a\nx;b\n";
        let log = parse_csv(content).unwrap();
        assert_eq!(log.traces[0].activities(), vec!["a", "b"]);
    }

    #[test]
    fn test_missing_activity_column() {
        let err = parse_csv("case_id,resource\n1,ann\n").unwrap_err();
        assert!(err.to_string().contains("no activity column"));
    }

    #[test]
    fn test_missing_case_id_value() {
        let err = parse_csv("case_id,activity\n,a\n").unwrap_err();
        assert_eq!(err.to_string(), "row 2: missing case id");
    }

    #[test]
    fn test_empty_activity_rows_are_skipped() {
        let log = parse_csv("case_id,activity\n1,\n2,a\n2,\n").unwrap();
        assert_eq!(log.trace_count(), 1);
        assert_eq!(log.traces[0].case_id, "2");
        assert_eq!(log.traces[0].activities(), vec!["a"]);
    }

    #[test]
    fn test_empty_activity_rows_do_not_make_tau() {
        let log = parse_csv("case_id,activity\n1,\n2,a\n").unwrap();
        let tree = crate::inductive::discover_tree(&log);
        assert_eq!(tree.notation(), "a");
    }
}
