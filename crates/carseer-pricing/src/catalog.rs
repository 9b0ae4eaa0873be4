use std::collections::BTreeMap;

use carseer_models::Segment;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// Base price used when neither the catalog nor its fallback row has an entry.
pub const DEFAULT_FALLBACK_PRICE: f64 = 25_000.0;

/// make -> model -> base price
pub type MakeTable = BTreeMap<String, BTreeMap<String, f64>>;

/// Segment -> make -> model -> base price in the catalog's reference year,
/// plus a fallback base price per segment for uncataloged models.
///
/// A make belongs to exactly one segment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SegmentCatalog {
    prices: BTreeMap<Segment, MakeTable>,
    #[serde(default)]
    fallback_prices: BTreeMap<Segment, f64>,
}

impl SegmentCatalog {
    pub fn new(
        prices: BTreeMap<Segment, MakeTable>,
        fallback_prices: BTreeMap<Segment, f64>,
    ) -> Result<Self, PricingError> {
        let catalog = Self {
            prices,
            fallback_prices,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Skips validation; for tables whose validity is covered by tests.
    pub(crate) fn from_parts(
        prices: BTreeMap<Segment, MakeTable>,
        fallback_prices: BTreeMap<Segment, f64>,
    ) -> Self {
        Self {
            prices,
            fallback_prices,
        }
    }

    /// Check that makes are unique across segments and every price is positive.
    pub fn validate(&self) -> Result<(), PricingError> {
        let mut seen: BTreeMap<&str, Segment> = BTreeMap::new();
        for (segment, makes) in &self.prices {
            for (make, models) in makes {
                if let Some(first) = seen.insert(make.as_str(), *segment) {
                    return Err(PricingError::DuplicateMake {
                        make: make.clone(),
                        first,
                        second: *segment,
                    });
                }
                for (model, price) in models {
                    if !price.is_finite() || *price <= 0.0 {
                        return Err(PricingError::InvalidTable(format!(
                            "{make} {model} has non-positive base price {price}"
                        )));
                    }
                }
            }
        }

        for (segment, price) in &self.fallback_prices {
            if !price.is_finite() || *price <= 0.0 {
                return Err(PricingError::InvalidTable(format!(
                    "{segment} fallback price must be positive, got {price}"
                )));
            }
        }

        Ok(())
    }

    /// Segment of the first catalog entry listing `make`; Mainstream when none does.
    pub fn classify_segment(&self, make: &str) -> Segment {
        self.prices
            .iter()
            .find(|(_, makes)| makes.contains_key(make))
            .map(|(segment, _)| *segment)
            .unwrap_or(Segment::Mainstream)
    }

    /// Exact (case-sensitive) base price lookup within one segment.
    pub fn lookup_base_price(&self, segment: Segment, make: &str, model: &str) -> Option<f64> {
        self.prices
            .get(&segment)
            .and_then(|makes| makes.get(make))
            .and_then(|models| models.get(model))
            .copied()
    }

    pub fn fallback_base_price(&self, segment: Segment) -> f64 {
        self.fallback_prices
            .get(&segment)
            .copied()
            .unwrap_or(DEFAULT_FALLBACK_PRICE)
    }

    /// Map user-supplied spellings ("mercedes-benz", "cr-v ") onto catalog names.
    ///
    /// Names with no normalized match are returned unchanged.
    pub fn canonical_names<'a>(&'a self, make: &'a str, model: &'a str) -> (&'a str, &'a str) {
        let wanted_make = normalize_name(make);
        let Some((catalog_make, models)) = self
            .prices
            .values()
            .flat_map(|makes| makes.iter())
            .find(|(name, _)| normalize_name(name) == wanted_make)
        else {
            return (make, model);
        };

        let wanted_model = normalize_name(model);
        let catalog_model = models
            .keys()
            .find(|name| normalize_name(name) == wanted_model)
            .map(String::as_str)
            .unwrap_or(model);

        (catalog_make.as_str(), catalog_model)
    }

    /// All cataloged makes, in scan order.
    pub fn makes(&self) -> impl Iterator<Item = (Segment, &str)> {
        self.prices
            .iter()
            .flat_map(|(segment, makes)| makes.keys().map(move |make| (*segment, make.as_str())))
    }

    pub fn models(&self, make: &str) -> Vec<&str> {
        self.prices
            .values()
            .find_map(|makes| makes.get(make))
            .map(|models| models.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Lowercase, drop punctuation other than hyphens, and collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();
    cleaned
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
