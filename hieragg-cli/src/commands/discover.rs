//! Local discovery
//!
//! Mines a log file in-process with the standard engine.

use anyhow::{Context, Result};
use hieragg_core::dto::discovery::DiscoveryResponse;
use hieragg_miner::{AggregationOptions, StandardDiscoveryEngine};
use std::path::Path;

use super::AggregationArgs;
use crate::output;

/// Discover (and optionally aggregate) a local log
pub async fn discover_local(path: &Path, aggregation: &AggregationArgs, json: bool) -> Result<()> {
    let path = path.to_path_buf();
    let options = AggregationOptions::from(aggregation.to_query());

    let model = tokio::task::spawn_blocking(move || -> Result<DiscoveryResponse> {
        let engine = StandardDiscoveryEngine::new(1);
        let discovered = engine
            .discover(&path)
            .with_context(|| format!("Failed to discover a model from {}", path.display()))?;

        let model = if options.is_noop() {
            discovered
        } else {
            engine.aggregate(discovered.log_id, &options)?
        };

        Ok(DiscoveryResponse {
            log_id: model.log_id.to_string(),
            model: model.net,
            tree: model.tree,
            stats: Some(model.stats),
        })
    })
    .await??;

    if json {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        output::print_model(&model);
    }

    Ok(())
}
