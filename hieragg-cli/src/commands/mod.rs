//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod discover;
mod remote;

use anyhow::Result;
use clap::{Args, Subcommand};
use hieragg_core::dto::aggregate::{AggregateQuery, Metric};
use std::path::PathBuf;

use crate::config::Config;

/// Aggregation flags shared by several commands
#[derive(Args, Debug, Clone, Default)]
pub struct AggregationArgs {
    /// Collapse operator nodes at this depth (root = 0)
    #[arg(short, long)]
    pub level: Option<usize>,

    /// Collapse subtrees whose metric value is below this value
    #[arg(short, long)]
    pub threshold: Option<u64>,

    /// Metric compared against the threshold
    #[arg(short, long, default_value = "frequency")]
    pub metric: Metric,
}

impl AggregationArgs {
    pub fn to_query(&self) -> AggregateQuery {
        AggregateQuery {
            level: self.level,
            metric: self.metric,
            threshold: self.threshold,
        }
    }
}

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Discover a model from a local log file without a server
    Discover {
        /// CSV or JSON event log
        path: PathBuf,

        #[command(flatten)]
        aggregation: AggregationArgs,

        /// Print the model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload a log to the server and discover its model
    Upload {
        /// CSV or JSON event log
        path: PathBuf,

        /// Print the model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-aggregate a model previously discovered by the server
    Aggregate {
        /// Log id returned by discovery
        log_id: String,

        #[command(flatten)]
        aggregation: AggregationArgs,

        /// Print the model as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Discover {
            path,
            aggregation,
            json,
        } => discover::discover_local(&path, &aggregation, json).await,
        Commands::Upload { path, json } => remote::upload(config, &path, json).await,
        Commands::Aggregate {
            log_id,
            aggregation,
            json,
        } => remote::aggregate(config, &log_id, &aggregation, json).await,
    }
}
