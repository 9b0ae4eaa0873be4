use std::sync::Arc;
use std::time::{Duration, Instant};

use carseer_models::{
    Confidence, MarketConfig, MarketEstimate, PriceRange, QuoteSet, ValuationResult,
    ValuationSource, VehicleQuery,
};
use carseer_pricing::{current_year, validate_query, PricingCalculator, PricingError};
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::MarketError;
use crate::provider::QuoteProvider;
use crate::reconciler::reconcile_priced;
use crate::trims::{merge_trims, static_trims};

/// Quote count at which a tight market estimate is rated high confidence.
const HIGH_CONFIDENCE_QUOTES: usize = 3;
/// Maximum std_dev / median for high confidence.
const HIGH_CONFIDENCE_SPREAD: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Produces valuations from live market quotes, falling back to the catalog.
pub struct Orchestrator {
    calculator: Arc<PricingCalculator>,
    providers: Vec<Arc<dyn QuoteProvider>>,
    config: MarketConfig,
}

impl Orchestrator {
    pub fn new(
        calculator: Arc<PricingCalculator>,
        providers: Vec<Arc<dyn QuoteProvider>>,
        config: MarketConfig,
    ) -> Self {
        Self {
            calculator,
            providers,
            config,
        }
    }

    pub fn calculator(&self) -> &PricingCalculator {
        &self.calculator
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Value a vehicle as of the current year.
    pub async fn predict(&self, query: &VehicleQuery) -> Result<ValuationResult, PricingError> {
        self.predict_at(query, current_year()).await
    }

    /// Value a vehicle as of `reference_year`.
    ///
    /// Only invalid queries fail. Provider errors and timeouts reduce the
    /// result to the catalog estimate.
    pub async fn predict_at(
        &self,
        query: &VehicleQuery,
        reference_year: i32,
    ) -> Result<ValuationResult, PricingError> {
        validate_query(query)?;

        let start = Instant::now();
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            make = %query.make,
            model = %query.model,
            year = query.year,
            "Starting valuation"
        );

        let catalog = self.calculator.estimate(query, reference_year);

        if !self.config.enabled || self.providers.is_empty() {
            info!(
                %request_id,
                predicted_value = %catalog.predicted_value,
                "Market quotes unavailable, using catalog estimate"
            );
            return Ok(catalog);
        }

        let quotes = self.collect_quotes(request_id, query).await;

        let result = match reconcile_priced(&quotes) {
            Ok((market, predicted_value)) => market_valuation(catalog, market, predicted_value),
            Err(e) => {
                info!(%request_id, reason = %e, "Using catalog estimate");
                catalog
            }
        };

        info!(
            %request_id,
            predicted_value = %result.predicted_value,
            source = ?result.source,
            confidence = ?result.confidence,
            elapsed_ms = start.elapsed().as_millis(),
            "Valuation complete"
        );

        Ok(result)
    }

    /// Fan out to every provider concurrently. Failed, slow, and panicked
    /// providers contribute nothing.
    async fn collect_quotes(&self, request_id: Uuid, query: &VehicleQuery) -> QuoteSet {
        let timeout = self.provider_timeout();

        let mut handles = Vec::new();
        for provider in &self.providers {
            let provider = Arc::clone(provider);
            let query = query.clone();

            handles.push(tokio::spawn(async move {
                let provider_start = Instant::now();
                let result = tokio::time::timeout(timeout, provider.fetch_quotes(&query))
                    .await
                    .unwrap_or_else(|_| Err(MarketError::Timeout(timeout.as_secs())));
                (provider.name().to_string(), result, provider_start.elapsed())
            }));
        }

        let mut quotes = QuoteSet::new();
        for handle in handles {
            match handle.await {
                Ok((name, Ok(batch), elapsed)) => {
                    info!(
                        %request_id,
                        provider = %name,
                        quotes = batch.len(),
                        elapsed_ms = elapsed.as_millis(),
                        "Provider succeeded"
                    );
                    quotes.extend(batch);
                }
                Ok((name, Err(e), elapsed)) => {
                    warn!(
                        %request_id,
                        provider = %name,
                        error = %e,
                        elapsed_ms = elapsed.as_millis(),
                        "Provider failed"
                    );
                }
                Err(e) => {
                    error!(%request_id, error = %e, "Provider task panicked");
                }
            }
        }

        quotes
    }

    /// Static trims for the make/model merged with any trims providers report.
    pub async fn list_trims(&self, make: &str, model: &str) -> Vec<String> {
        let catalog = &self.calculator.tables().catalog;
        let (make, model) = catalog.canonical_names(make, model);
        let segment = catalog.classify_segment(make);

        let mut trims = static_trims(segment, make, model);

        if self.config.enabled {
            trims.extend(self.discover_trims(make, model).await);
        }

        merge_trims(trims)
    }

    async fn discover_trims(&self, make: &str, model: &str) -> Vec<String> {
        let timeout = self.provider_timeout();

        let mut handles = Vec::new();
        for provider in &self.providers {
            let provider = Arc::clone(provider);
            let make = make.to_string();
            let model = model.to_string();

            handles.push(tokio::spawn(async move {
                let result = tokio::time::timeout(timeout, provider.discover_trims(&make, &model))
                    .await
                    .unwrap_or_else(|_| Err(MarketError::Timeout(timeout.as_secs())));
                (provider.name().to_string(), result)
            }));
        }

        let mut discovered = Vec::new();
        for handle in handles {
            match handle.await {
                Ok((_, Ok(trims))) => discovered.extend(trims),
                Ok((name, Err(e))) => {
                    warn!(provider = %name, error = %e, "Trim discovery failed");
                }
                Err(e) => {
                    error!(error = %e, "Trim discovery task panicked");
                }
            }
        }

        discovered
    }

    fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.config.provider_timeout_seconds)
    }
}

/// Replace the catalog value with the reconciled market value, keeping the
/// catalog's segment and factor breakdown.
fn market_valuation(
    catalog: ValuationResult,
    market: MarketEstimate,
    predicted_value: Decimal,
) -> ValuationResult {
    ValuationResult {
        predicted_value,
        price_range: PriceRange {
            low: market.low,
            high: market.high,
        },
        confidence: market_confidence(&market),
        source: ValuationSource::Market,
        market: Some(market),
        ..catalog
    }
}

fn market_confidence(market: &MarketEstimate) -> Confidence {
    let tight = market.median > Decimal::ZERO
        && market.std_dev <= market.median * HIGH_CONFIDENCE_SPREAD;

    if market.sample_size >= HIGH_CONFIDENCE_QUOTES && tight {
        Confidence::High
    } else if market.sample_size >= 2 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}
