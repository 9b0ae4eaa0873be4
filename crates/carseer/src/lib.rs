//! CarSeer - used-car valuation service
//!
//! Prices a vehicle from a segment catalog with depreciation and
//! trim/condition/mileage adjustments, and prefers live market quotes when
//! external providers are configured.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use carseer::models::{CarseerConfig, VehicleQuery};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let orchestrator = carseer::build_orchestrator(&CarseerConfig::default())?;
//! let query = VehicleQuery::new("Toyota", "Camry", 2021).with_mileage(30_000.0);
//! let valuation = orchestrator.predict(&query).await?;
//! println!("{}", valuation.predicted_value);
//! # Ok(())
//! # }
//! ```

pub use carseer_market as market;
pub use carseer_models as models;
pub use carseer_pricing as pricing;

pub mod server;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use carseer_market::{HttpQuoteProvider, Orchestrator, QuoteProvider};
use carseer_models::{CarseerConfig, MarketConfig, PricingConfig};
use carseer_pricing::{PricingCalculator, PricingTables};
use tracing::{info, warn};

/// Read a TOML config file. A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<CarseerConfig, anyhow::Error> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "Config file not found, using defaults");
        return Ok(CarseerConfig::default());
    }

    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&config_str).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// The built-in tables, or the file named by `tables_path`.
pub fn load_tables(config: &PricingConfig) -> Result<PricingTables, anyhow::Error> {
    match &config.tables_path {
        Some(path) => PricingTables::load(path)
            .with_context(|| format!("Failed to load pricing tables: {path}")),
        None => Ok(PricingTables::standard()),
    }
}

/// HTTP providers for every enabled provider that has an API key.
pub fn build_providers(market: &MarketConfig, client: reqwest::Client) -> Vec<Arc<dyn QuoteProvider>> {
    market
        .providers
        .iter()
        .filter(|p| p.enabled)
        .filter_map(|p| match HttpQuoteProvider::from_config(p, market, client.clone()) {
            Ok(provider) => {
                info!(provider = p.kind.name(), endpoint = provider.endpoint(), "Provider configured");
                Some(Arc::new(provider) as Arc<dyn QuoteProvider>)
            }
            Err(e) => {
                info!(provider = p.kind.name(), reason = %e, "Provider skipped");
                None
            }
        })
        .collect()
}

/// Build an Orchestrator from configuration.
pub fn build_orchestrator(config: &CarseerConfig) -> Result<Orchestrator, anyhow::Error> {
    let tables = load_tables(&config.pricing)?;
    let calculator = Arc::new(PricingCalculator::new(Arc::new(tables)));

    let providers = if config.market.enabled {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.market.provider_timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;
        build_providers(&config.market, client)
    } else {
        Vec::new()
    };

    Ok(Orchestrator::new(calculator, providers, config.market.clone()))
}
