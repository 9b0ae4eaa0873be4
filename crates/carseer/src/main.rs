use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "carseer", about = "CarSeer used-car valuation API")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/carseer.toml")]
    config: String,

    /// Listen address, overriding server.bind
    #[arg(short, long)]
    bind: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Provider API keys may live in .env
    dotenvy::dotenv().ok();

    // Initialize tracing (respects RUST_LOG env var)
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let mut config = carseer::load_config(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    let orchestrator =
        Arc::new(carseer::build_orchestrator(&config).context("Failed to build orchestrator")?);
    info!(
        providers = ?orchestrator.provider_names(),
        market_enabled = config.market.enabled,
        "Orchestrator ready"
    );

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();

    // Handle shutdown signals
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Received shutdown signal");
        shutdown.cancel();
    });

    carseer::server::serve(orchestrator, &config.server, cancel).await
}
