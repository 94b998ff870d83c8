use std::sync::Arc;

use hieragg_miner::StandardDiscoveryEngine;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod service;
pub mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hieragg_server=debug,hieragg_miner=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting hieragg server...");

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        upload_dir = %config.upload_dir.display(),
        max_upload_bytes = config.max_upload_bytes,
        store_capacity = config.store_capacity,
        "Configuration loaded"
    );

    let engine = Arc::new(StandardDiscoveryEngine::new(config.store_capacity));
    let state = AppState::new(engine, &config.upload_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create upload directory {}: {}",
            config.upload_dir.display(),
            e
        )
    })?;

    let app = api::create_router(state, config.max_upload_bytes);

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
