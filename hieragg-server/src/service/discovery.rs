//! Discovery Service
//!
//! Runs the engine on a blocking worker so mining never stalls the
//! async runtime.

use std::path::PathBuf;
use std::sync::Arc;

use hieragg_miner::{AggregationOptions, Discovery, DiscoveryEngine, EngineError, ErrorKind};
use tokio::task::JoinError;

/// Service error type
#[derive(Debug)]
pub enum DiscoveryError {
    Engine(EngineError),
    Worker(JoinError),
}

impl From<EngineError> for DiscoveryError {
    fn from(err: EngineError) -> Self {
        DiscoveryError::Engine(err)
    }
}

impl From<JoinError> for DiscoveryError {
    fn from(err: JoinError) -> Self {
        DiscoveryError::Worker(err)
    }
}

impl DiscoveryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiscoveryError::Engine(err) => err.kind(),
            DiscoveryError::Worker(_) => ErrorKind::Internal,
        }
    }
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::Engine(err) => write!(f, "{}", err),
            DiscoveryError::Worker(err) => write!(f, "Discovery worker failed: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Discovers a model from the saved log at `path`
pub async fn discover(engine: Arc<dyn DiscoveryEngine>, path: PathBuf) -> Result<Discovery> {
    let started = std::time::Instant::now();

    let discovery =
        tokio::task::spawn_blocking(move || engine.discover_process_tree_from_log(&path))
            .await??;

    tracing::info!(
        log_id = %discovery.log_id,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Discovery finished"
    );

    Ok(discovery)
}

/// Re-aggregates a previously discovered model
pub async fn aggregate(
    engine: Arc<dyn DiscoveryEngine>,
    log_id: String,
    options: AggregationOptions,
) -> Result<Discovery> {
    let discovery =
        tokio::task::spawn_blocking(move || engine.aggregate_process_tree(&log_id, &options))
            .await??;

    Ok(discovery)
}

/// Logs a failure at a level matching its classification
pub fn log_failure(context: &str, err: &DiscoveryError) {
    match err.kind() {
        ErrorKind::Validation | ErrorKind::NotFound => {
            tracing::warn!(error = %err, "{} rejected", context)
        }
        ErrorKind::Internal => tracing::error!(error = ?err, "{} failed", context),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hieragg_miner::StandardDiscoveryEngine;

    #[tokio::test]
    async fn test_discover_missing_file() {
        let engine: Arc<dyn DiscoveryEngine> = Arc::new(StandardDiscoveryEngine::default());
        let err = discover(engine, PathBuf::from("/nonexistent/log.csv"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().contains("log.csv"));
    }

    #[tokio::test]
    async fn test_aggregate_unknown_log() {
        let engine: Arc<dyn DiscoveryEngine> = Arc::new(StandardDiscoveryEngine::default());
        let err = aggregate(engine, "missing".to_string(), AggregationOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Log missing not found");
    }
}
