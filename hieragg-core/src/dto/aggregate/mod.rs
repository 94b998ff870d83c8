//! Aggregation DTOs

use serde::{Deserialize, Serialize};

/// Metric used to decide which subtrees collapse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Number of events a subtree was mined from
    #[default]
    Frequency,
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "frequency" => Ok(Metric::Frequency),
            other => Err(format!("Unknown metric '{}'", other)),
        }
    }
}

/// Query parameters of `GET /api/aggregate/{log_id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateQuery {
    /// Collapse operator nodes at this depth (root = 0)
    pub level: Option<usize>,

    #[serde(default)]
    pub metric: Metric,

    /// Collapse operator subtrees whose metric is below this value
    pub threshold: Option<u64>,
}
