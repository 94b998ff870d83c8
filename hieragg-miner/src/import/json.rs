//! JSON event log import
//!
//! Accepted layouts:
//! - `[{"case_id": "1", "events": [{"activity": "a", "timestamp": ".."}]}]`
//! - `[{"case_id": "1", "activity": "a", "timestamp": ".."}]`
//! - `{"traces": [...]}` wrapping either of the above

use serde_json::{Map, Value};

use hieragg_core::domain::event_log::{Event, EventLog};

use super::{TraceBuilder, parse_timestamp};
use crate::error::{EngineError, Result};

const CASE_KEYS: [&str; 4] = ["case_id", "case:concept:name", "caseId", "case"];
const ACTIVITY_KEYS: [&str; 3] = ["activity", "concept:name", "name"];
const TIMESTAMP_KEYS: [&str; 2] = ["timestamp", "time:timestamp"];

fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| object.get(*k))
}

/// Renders a scalar as text; case ids are often numbers
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_event(object: &Map<String, Value>, position: &str) -> Result<Option<Event>> {
    let activity = match lookup(object, &ACTIVITY_KEYS) {
        Some(value) => scalar_text(value).ok_or_else(|| {
            EngineError::invalid_log(format!("{}: activity must be a string", position))
        })?,
        None => {
            return Err(EngineError::invalid_log(format!(
                "{}: missing activity",
                position
            )));
        }
    };

    if activity.is_empty() {
        return Ok(None);
    }

    let timestamp = lookup(object, &TIMESTAMP_KEYS)
        .and_then(Value::as_str)
        .and_then(parse_timestamp);

    let attributes = object
        .iter()
        .filter(|(k, _)| {
            !ACTIVITY_KEYS.contains(&k.as_str())
                && !TIMESTAMP_KEYS.contains(&k.as_str())
                && !CASE_KEYS.contains(&k.as_str())
        })
        .filter_map(|(k, v)| scalar_text(v).map(|text| (k.clone(), text)))
        .collect();

    Ok(Some(Event {
        activity,
        timestamp,
        attributes,
    }))
}

fn case_id_of(object: &Map<String, Value>, position: &str) -> Result<String> {
    lookup(object, &CASE_KEYS)
        .and_then(scalar_text)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| EngineError::invalid_log(format!("{}: missing case id", position)))
}

/// Parses a JSON log
pub fn parse_json(content: &str) -> Result<EventLog> {
    let root: Value = serde_json::from_str(content)?;

    let items = match root {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("traces") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(EngineError::invalid_log(
                    "expected a top-level array or an object with a \"traces\" array",
                ));
            }
        },
        _ => {
            return Err(EngineError::invalid_log(
                "expected a top-level array or an object with a \"traces\" array",
            ));
        }
    };

    let mut builder = TraceBuilder::default();

    for (i, item) in items.iter().enumerate() {
        let position = format!("item {}", i);
        let object = item.as_object().ok_or_else(|| {
            EngineError::invalid_log(format!("{}: expected an object", position))
        })?;
        let case_id = case_id_of(object, &position)?;

        match object.get("events") {
            Some(Value::Array(events)) => {
                builder.touch(&case_id);
                for (j, event) in events.iter().enumerate() {
                    let position = format!("item {} event {}", i, j);
                    let event_object = event.as_object().ok_or_else(|| {
                        EngineError::invalid_log(format!("{}: expected an object", position))
                    })?;
                    if let Some(event) = parse_event(event_object, &position)? {
                        builder.push(&case_id, event);
                    }
                }
            }
            Some(_) => {
                return Err(EngineError::invalid_log(format!(
                    "{}: \"events\" must be an array",
                    position
                )));
            }
            None => {
                if let Some(event) = parse_event(object, &position)? {
                    builder.push(&case_id, event);
                }
            }
        }
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_traces() {
        let content = r#"[
            {"case_id": 1, "events": [{"activity": "a"}, {"activity": "b"}]},
            {"case_id": 2, "events": [{"concept:name": "a"}]}
        ]"#;
        let log = parse_json(content).unwrap();
        assert_eq!(log.trace_count(), 2);
        assert_eq!(log.traces[0].case_id, "1");
        assert_eq!(log.traces[0].activities(), vec!["a", "b"]);
    }

    #[test]
    fn test_flat_events_grouped_and_sorted() {
        let content = r#"{"traces": [
            {"case": "x", "activity": "b", "timestamp": "2024-01-01T10:00:00Z", "cost": 3},
            {"case": "y", "activity": "a", "timestamp": "2024-01-01T08:00:00Z"},
            {"case": "x", "activity": "a", "timestamp": "2024-01-01T09:00:00Z"}
        ]}"#;
        let log = parse_json(content).unwrap();
        assert_eq!(log.trace_count(), 2);
        assert_eq!(log.traces[0].activities(), vec!["a", "b"]);
        assert_eq!(
            log.traces[0].events[1].attributes.get("cost"),
            Some(&"3".to_string())
        );
    }

    #[test]
    fn test_flat_event_without_activity_is_skipped() {
        let content = r#"[
            {"case": "x", "activity": ""},
            {"case": "y", "activity": "a"}
        ]"#;
        let log = parse_json(content).unwrap();
        assert_eq!(log.trace_count(), 1);
        assert_eq!(log.traces[0].case_id, "y");
    }

    #[test]
    fn test_nested_empty_events_keep_trace() {
        let content = r#"[
            {"case_id": 1, "events": []},
            {"case_id": 2, "events": [{"activity": "a"}]}
        ]"#;
        let log = parse_json(content).unwrap();
        assert_eq!(log.trace_count(), 2);
        assert!(log.traces[0].events.is_empty());
    }

    #[test]
    fn test_missing_case_id() {
        let err = parse_json(r#"[{"activity": "a"}]"#).unwrap_err();
        assert_eq!(err.to_string(), "item 0: missing case id");
    }

    #[test]
    fn test_rejects_scalar_root() {
        assert!(parse_json("42").is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_json("[{").unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }
}
