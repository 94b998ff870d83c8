//! Shared application state

use std::path::PathBuf;
use std::sync::Arc;

use hieragg_miner::DiscoveryEngine;

/// State handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn DiscoveryEngine>,
    pub upload_dir: PathBuf,
}

impl AppState {
    /// Creates the state, creating the upload directory if it is missing
    pub fn new(
        engine: Arc<dyn DiscoveryEngine>,
        upload_dir: impl Into<PathBuf>,
    ) -> std::io::Result<Self> {
        let upload_dir = upload_dir.into();
        std::fs::create_dir_all(&upload_dir)?;

        Ok(Self { engine, upload_dir })
    }
}
