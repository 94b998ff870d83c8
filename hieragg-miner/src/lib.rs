//! Hieragg Miner
//!
//! The discovery and aggregation engine behind the hieragg service.
//! It includes:
//! - Event log import (CSV and JSON)
//! - Directly-follows graph construction
//! - Inductive-miner style process tree discovery
//! - Process tree to Petri net translation
//! - Hierarchical aggregation of discovered trees
//! - The [`DiscoveryEngine`] trait and its standard implementation

pub mod aggregate;
pub mod dfg;
pub mod engine;
pub mod error;
pub mod import;
pub mod inductive;
pub mod petri;
pub mod store;

pub use aggregate::{AggregationContext, AggregationOptions, aggregate_tree};
pub use dfg::Dfg;
pub use engine::{DiscoveredModel, Discovery, DiscoveryEngine, StandardDiscoveryEngine};
pub use error::{EngineError, ErrorKind, Result};
pub use import::{LogFormat, read_log};
pub use inductive::discover_tree;
pub use petri::tree_to_petri_net;
pub use store::{ModelStore, StoredModel};
