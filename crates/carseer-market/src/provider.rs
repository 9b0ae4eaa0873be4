use async_trait::async_trait;
use carseer_models::{Quote, VehicleQuery};

use crate::error::MarketError;

/// An external source of price quotes. Mockable for testing.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_quotes(&self, query: &VehicleQuery) -> Result<Vec<Quote>, MarketError>;

    /// Trim names the provider knows for a make/model. Most providers have none.
    async fn discover_trims(&self, _make: &str, _model: &str) -> Result<Vec<String>, MarketError> {
        Ok(Vec::new())
    }
}
