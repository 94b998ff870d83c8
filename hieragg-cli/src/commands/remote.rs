//! Server-backed commands

use anyhow::{Context, Result};
use colored::*;
use hieragg_client::HieraggClient;
use hieragg_core::dto::discovery::DiscoveryResponse;
use std::path::Path;

use super::AggregationArgs;
use crate::config::Config;
use crate::output;

/// Upload a log and print the discovered model
pub async fn upload(config: &Config, path: &Path, json: bool) -> Result<()> {
    let client = HieraggClient::new(&config.server_url);

    let model = client
        .discover(path)
        .await
        .with_context(|| format!("Discovery of {} failed", path.display()))?;

    show(&model, json)?;
    if !json {
        println!(
            "\nRe-aggregate with: {}",
            format!("hieragg aggregate {} --level 1", model.log_id).cyan()
        );
    }

    Ok(())
}

/// Re-aggregate a model stored on the server
pub async fn aggregate(
    config: &Config,
    log_id: &str,
    aggregation: &AggregationArgs,
    json: bool,
) -> Result<()> {
    let client = HieraggClient::new(&config.server_url);

    let model = match client.aggregate(log_id, &aggregation.to_query()).await {
        Ok(model) => model,
        Err(e) if e.is_not_found() => {
            anyhow::bail!("No model with id {} on {}", log_id, config.server_url)
        }
        Err(e) => return Err(e.into()),
    };

    show(&model, json)
}

fn show(model: &DiscoveryResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(model)?);
    } else {
        output::print_model(model);
    }
    Ok(())
}
