use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::quote::MarketEstimate;
use crate::segment::Segment;

/// Coarse indicator of how directly an estimate traces to catalog or provider data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValuationSource {
    /// Catalog base price with multiplicative adjustments.
    Catalog,
    /// Median of live provider quotes.
    Market,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRange {
    #[serde(with = "rust_decimal::serde::float")]
    pub low: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub high: Decimal,
}

/// Breakdown of the catalog estimate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuationFactors {
    /// Depreciated base value, before trim/condition/mileage.
    #[serde(with = "rust_decimal::serde::float")]
    pub base_value: Decimal,
    pub trim_multiplier: f64,
    pub condition_multiplier: f64,
    pub mileage_multiplier: f64,
}

/// The estimate returned for a `VehicleQuery`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuationResult {
    /// Rounded to the nearest 100.
    #[serde(with = "rust_decimal::serde::float")]
    pub predicted_value: Decimal,
    pub price_range: PriceRange,
    pub category: Segment,
    pub factors: ValuationFactors,
    pub confidence: Confidence,
    pub source: ValuationSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<MarketEstimate>,
}
