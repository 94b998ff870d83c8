//! Discovery engine
//!
//! The boundary the web layer talks to: discover a model from a saved log
//! file, and re-aggregate a previously discovered model.
//!
//! The trait deals in JSON so callers do not depend on the model schema;
//! [`StandardDiscoveryEngine`] also exposes typed variants for local use.

use std::path::Path;

use chrono::Utc;
use hieragg_core::domain::petri::PetriNet;
use hieragg_core::domain::tree::TreeNode;
use hieragg_core::dto::discovery::LogStats;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::aggregate::{AggregationContext, AggregationOptions, aggregate_tree};
use crate::error::{EngineError, Result};
use crate::import::read_log;
use crate::inductive::discover_tree;
use crate::petri::tree_to_petri_net;
use crate::store::{ModelStore, StoredModel};

/// Default number of models kept for re-aggregation
pub const DEFAULT_STORE_CAPACITY: usize = 128;

/// Engine output: identifier, model description and tree description
#[derive(Debug, Clone, PartialEq)]
pub struct Discovery {
    pub log_id: String,
    pub model: Map<String, Value>,
    pub tree: Value,
}

impl Discovery {
    /// Response body: `logId`, then the model's fields, then `tree`
    pub fn into_body(self) -> Value {
        let mut body = Map::new();
        body.insert("logId".to_string(), Value::String(self.log_id));
        body.extend(self.model);
        body.insert("tree".to_string(), self.tree);
        Value::Object(body)
    }
}

/// Discovery/aggregation engine
pub trait DiscoveryEngine: Send + Sync {
    /// Discovers a model from the log stored at `path`
    fn discover_process_tree_from_log(&self, path: &Path) -> Result<Discovery>;

    /// Re-aggregates the tree of a previous discovery
    fn aggregate_process_tree(&self, log_id: &str, options: &AggregationOptions)
    -> Result<Discovery>;
}

/// Typed result of the standard engine
#[derive(Debug, Clone)]
pub struct DiscoveredModel {
    pub log_id: Uuid,
    pub net: PetriNet,
    pub tree: TreeNode,
    pub stats: LogStats,
}

impl DiscoveredModel {
    pub fn into_discovery(self) -> Result<Discovery> {
        let mut model = match serde_json::to_value(&self.net)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        model.insert("stats".to_string(), serde_json::to_value(self.stats)?);

        Ok(Discovery {
            log_id: self.log_id.to_string(),
            model,
            tree: serde_json::to_value(&self.tree)?,
        })
    }
}

/// Inductive-miner based engine with an in-memory model store
#[derive(Debug)]
pub struct StandardDiscoveryEngine {
    store: ModelStore,
}

impl StandardDiscoveryEngine {
    pub fn new(store_capacity: usize) -> Self {
        Self {
            store: ModelStore::new(store_capacity),
        }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Imports, mines and stores the log at `path`
    pub fn discover(&self, path: &Path) -> Result<DiscoveredModel> {
        let log = read_log(path)?;
        let stats = LogStats::from_log(&log);

        let tree = TreeNode::from_tree(&discover_tree(&log));
        let net = tree_to_petri_net(&tree);
        let log_id = Uuid::new_v4();

        self.store.insert(
            log_id,
            StoredModel {
                tree: tree.clone(),
                stats,
                source: path.to_path_buf(),
                discovered_at: Utc::now(),
            },
        );

        tracing::info!(
            log_id = %log_id,
            traces = stats.traces,
            events = stats.events,
            activities = stats.activities,
            stored = self.store.len(),
            "Process tree discovered"
        );

        Ok(DiscoveredModel {
            log_id,
            net,
            tree,
            stats,
        })
    }

    /// Aggregates a stored tree with a fresh context
    pub fn aggregate(&self, log_id: Uuid, options: &AggregationOptions) -> Result<DiscoveredModel> {
        let stored = self
            .store
            .get(&log_id)
            .ok_or_else(|| EngineError::UnknownLog(log_id.to_string()))?;
        options.validate(&stored.tree)?;

        tracing::debug!(
            log_id = %log_id,
            source = %stored.source.display(),
            age_secs = (Utc::now() - stored.discovered_at).num_seconds(),
            "Aggregating stored model"
        );

        let mut ctx = AggregationContext::new();
        let tree = aggregate_tree(&stored.tree, options, &mut ctx);
        let net = tree_to_petri_net(&tree);

        tracing::info!(
            log_id = %log_id,
            level = ?options.level,
            threshold = ?options.threshold,
            aggregates = ctx.aggregates(),
            "Process tree aggregated"
        );

        Ok(DiscoveredModel {
            log_id,
            net,
            tree,
            stats: stored.stats,
        })
    }
}

impl Default for StandardDiscoveryEngine {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_CAPACITY)
    }
}

impl DiscoveryEngine for StandardDiscoveryEngine {
    fn discover_process_tree_from_log(&self, path: &Path) -> Result<Discovery> {
        self.discover(path)?.into_discovery()
    }

    fn aggregate_process_tree(
        &self,
        log_id: &str,
        options: &AggregationOptions,
    ) -> Result<Discovery> {
        let id =
            Uuid::parse_str(log_id).map_err(|_| EngineError::UnknownLog(log_id.to_string()))?;
        self.aggregate(id, options)?.into_discovery()
    }
}
