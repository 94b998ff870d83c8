//! Server configuration
//!
//! Bind address, upload location and resource limits, read from the
//! environment with defaults suited to local use.

use std::path::PathBuf;

use hieragg_miner::engine::DEFAULT_STORE_CAPACITY;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_UPLOAD_MB: usize = 64;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to
    pub bind_addr: String,

    /// Directory uploaded logs are saved into
    pub upload_dir: PathBuf,

    /// Largest accepted request body
    pub max_upload_bytes: usize,

    /// Number of discovered models kept for re-aggregation
    pub store_capacity: usize,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Recognised environment variables:
    /// - HIERAGG_BIND_ADDR (default: 0.0.0.0:5000)
    /// - HIERAGG_UPLOAD_DIR (default: uploads)
    /// - HIERAGG_MAX_UPLOAD_MB (default: 64)
    /// - HIERAGG_STORE_CAPACITY (default: 128)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("HIERAGG_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let upload_dir = std::env::var("HIERAGG_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let max_upload_mb = match std::env::var("HIERAGG_MAX_UPLOAD_MB") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("HIERAGG_MAX_UPLOAD_MB must be a number: {raw}"))?,
            Err(_) => DEFAULT_MAX_UPLOAD_MB,
        };

        let store_capacity = match std::env::var("HIERAGG_STORE_CAPACITY") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("HIERAGG_STORE_CAPACITY must be a number: {raw}"))?,
            Err(_) => DEFAULT_STORE_CAPACITY,
        };

        Ok(Self {
            bind_addr,
            upload_dir,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            store_capacity,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.trim().is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.upload_dir.as_os_str().is_empty() {
            anyhow::bail!("upload_dir cannot be empty");
        }

        if self.max_upload_bytes == 0 {
            anyhow::bail!("max_upload_bytes must be greater than 0");
        }

        if self.store_capacity == 0 {
            anyhow::bail!("store_capacity must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            store_capacity: DEFAULT_STORE_CAPACITY,
        }
    }
}
