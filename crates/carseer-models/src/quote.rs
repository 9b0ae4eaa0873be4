use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuoteKind {
    /// A guide value (e.g. a retail or private-party book value).
    Valuation,
    /// The asking price of a single for-sale listing.
    Listing,
}

/// A single price observation from an external source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub source: String,
    pub value: f64,
    pub kind: QuoteKind,
}

impl Quote {
    /// Ceiling on a believable vehicle price. Anything above is feed garbage.
    pub const MAX_VALUE: f64 = 1.0e9;

    /// Whether a raw price can take part in a market estimate.
    pub fn is_usable_value(value: f64) -> bool {
        value.is_finite() && value > 0.0 && value <= Self::MAX_VALUE
    }

    pub fn is_usable(&self) -> bool {
        Self::is_usable_value(self.value)
    }

    pub fn valuation(source: impl Into<String>, value: f64) -> Self {
        Self {
            source: source.into(),
            value,
            kind: QuoteKind::Valuation,
        }
    }

    pub fn listing(source: impl Into<String>, value: f64) -> Self {
        Self {
            source: source.into(),
            value,
            kind: QuoteKind::Listing,
        }
    }
}

/// Quotes gathered for one valuation request, in arrival order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuoteSet {
    quotes: Vec<Quote>,
}

impl QuoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quote> {
        self.quotes.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.quotes.iter().map(|q| q.value).collect()
    }

    /// Number of quotes each source contributed.
    pub fn source_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for quote in &self.quotes {
            *counts.entry(quote.source.clone()).or_insert(0) += 1;
        }
        counts
    }
}

impl FromIterator<Quote> for QuoteSet {
    fn from_iter<I: IntoIterator<Item = Quote>>(iter: I) -> Self {
        Self {
            quotes: iter.into_iter().collect(),
        }
    }
}

impl Extend<Quote> for QuoteSet {
    fn extend<I: IntoIterator<Item = Quote>>(&mut self, iter: I) {
        self.quotes.extend(iter);
    }
}

impl<'a> IntoIterator for &'a QuoteSet {
    type Item = &'a Quote;
    type IntoIter = std::slice::Iter<'a, Quote>;

    fn into_iter(self) -> Self::IntoIter {
        self.quotes.iter()
    }
}

/// Reconciled market view over a `QuoteSet`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketEstimate {
    /// Primary estimate.
    #[serde(with = "rust_decimal::serde::float")]
    pub median: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub mean: Decimal,
    /// Sample standard deviation; zero for fewer than two quotes.
    #[serde(with = "rust_decimal::serde::float")]
    pub std_dev: Decimal,
    /// median - std_dev
    #[serde(with = "rust_decimal::serde::float")]
    pub low: Decimal,
    /// median + std_dev
    #[serde(with = "rust_decimal::serde::float")]
    pub high: Decimal,
    pub sample_size: usize,
    pub sources: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn usable_values() {
        assert!(Quote::valuation("kbb", 21_000.0).is_usable());
        assert!(Quote::is_usable_value(Quote::MAX_VALUE));
        assert!(!Quote::is_usable_value(0.0));
        assert!(!Quote::is_usable_value(-1.0));
        assert!(!Quote::is_usable_value(f64::NAN));
        assert!(!Quote::is_usable_value(f64::INFINITY));
        assert!(!Quote::listing("cargurus", 1e30).is_usable());
    }

    #[test]
    fn source_counts_group_by_provider() {
        let quotes: QuoteSet = vec![
            Quote::valuation("kbb", 21_000.0),
            Quote::valuation("kbb", 19_500.0),
            Quote::listing("cargurus", 20_400.0),
        ]
        .into_iter()
        .collect();

        let counts = quotes.source_counts();
        assert_eq!(counts.get("kbb"), Some(&2));
        assert_eq!(counts.get("cargurus"), Some(&1));
        assert_eq!(quotes.values(), vec![21_000.0, 19_500.0, 20_400.0]);
    }

    #[test]
    fn quote_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&QuoteKind::Listing).unwrap(),
            "\"listing\""
        );
    }

    #[test]
    fn market_estimate_serializes_amounts_as_numbers() {
        let estimate = MarketEstimate {
            median: dec!(20400),
            mean: dec!(20300),
            std_dev: dec!(755),
            low: dec!(19645),
            high: dec!(21155),
            sample_size: 3,
            sources: BTreeMap::from([("kbb".to_string(), 2), ("cargurus".to_string(), 1)]),
        };

        let json = serde_json::to_value(&estimate).unwrap();
        assert_eq!(json["median"], serde_json::json!(20400.0));
        assert_eq!(json["sources"]["kbb"], serde_json::json!(2));
    }
}
