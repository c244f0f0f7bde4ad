//! Almahook CLI
//!
//! Command-line helper for exercising an almahook receiver without
//! waiting for Alma to run a real job: send challenge requests, send
//! signed JOB_END webhooks and compute signatures for arbitrary bodies.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "almahook")]
#[command(about = "Alma webhook receiver test CLI", long_about = None)]
struct Cli {
    /// Webhook receiver URL
    #[arg(long, env = "ALMAHOOK_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        webhook_url: cli.url,
    };

    handle_command(cli.command, &config).await
}
