//! Discovery DTOs

use serde::{Deserialize, Serialize};

use std::collections::HashSet;

use crate::domain::event_log::EventLog;
use crate::domain::petri::PetriNet;
use crate::domain::tree::TreeNode;

/// Body returned by a successful discovery or aggregation
///
/// The model's fields sit at the top level next to `logId` and `tree`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryResponse {
    #[serde(rename = "logId")]
    pub log_id: String,
    #[serde(flatten)]
    pub model: PetriNet,
    pub tree: TreeNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<LogStats>,
}

/// Summary figures of an imported event log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStats {
    pub traces: usize,
    pub events: usize,
    pub activities: usize,
    /// Distinct activity sequences
    pub variants: usize,
}

impl LogStats {
    pub fn from_log(log: &EventLog) -> Self {
        let variants: HashSet<Vec<String>> = log.sequences().into_iter().collect();
        Self {
            traces: log.trace_count(),
            events: log.event_count(),
            activities: log.activities().len(),
            variants: variants.len(),
        }
    }
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::ProcessTree;

    #[test]
    fn test_response_flattens_model() {
        let response = DiscoveryResponse {
            log_id: "X".to_string(),
            model: PetriNet::default(),
            tree: TreeNode::from_tree(&ProcessTree::activity("a", 1)),
            stats: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["logId"], "X");
        assert!(json["nodes"].is_array());
        assert!(json["links"].is_array());
        assert_eq!(json["tree"]["label"], "a");
        assert!(json.get("stats").is_none());
    }

    #[test]
    fn test_response_parses_extra_model_fields() {
        let body = r#"{"logId":"X","nodes":[],"links":[],"tree":{"id":"n0","label":"a",
            "kind":"activity","frequency":1,"depth":0,"children":[]},
            "stats":{"traces":1,"events":1,"activities":1,"variants":1}}"#;
        let response: DiscoveryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.log_id, "X");
        assert_eq!(response.stats.unwrap().events, 1);
    }
}
