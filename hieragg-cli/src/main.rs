//! Hieragg CLI
//!
//! Discover process models locally or through a hieragg server.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "hieragg")]
#[command(about = "Process discovery with hierarchical aggregation", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, env = "HIERAGG_SERVER_URL", default_value = "http://localhost:5000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server,
    };

    handle_command(cli.command, &config).await
}
