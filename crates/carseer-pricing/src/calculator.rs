use std::sync::Arc;

use carseer_models::{
    Condition, Confidence, PriceRange, Segment, ValuationFactors, ValuationResult,
    ValuationSource, VehicleQuery,
};
use chrono::Datelike;
use tracing::debug;

use crate::error::PricingError;
use crate::money;
use crate::tables::PricingTables;
use crate::trim::TrimMatcherChain;

/// Mileage can never take more than 70% off the value.
const MILEAGE_FLOOR: f64 = 0.3;

/// Earliest model year accepted.
const FIRST_MODEL_YEAR: i32 = 1886;

/// Current calendar year (UTC), the default reference year for depreciation.
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Reject queries the engine cannot price.
pub fn validate_query(query: &VehicleQuery) -> Result<(), PricingError> {
    if query.make.trim().is_empty() {
        return Err(PricingError::InvalidRequest("make is required".to_string()));
    }
    if query.model.trim().is_empty() {
        return Err(PricingError::InvalidRequest("model is required".to_string()));
    }
    if query.year < FIRST_MODEL_YEAR {
        return Err(PricingError::InvalidRequest(format!(
            "year must be {FIRST_MODEL_YEAR} or later, got {}",
            query.year
        )));
    }
    if let Some(mileage) = query.mileage {
        if !mileage.is_finite() || mileage < 0.0 {
            return Err(PricingError::InvalidRequest(format!(
                "mileage must be a non-negative number, got {mileage}"
            )));
        }
    }
    Ok(())
}

/// Depreciated base value and how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BaseValue {
    segment: Segment,
    value: f64,
    exact: bool,
}

/// Catalog-driven pricing model. Pure: results depend only on the tables and inputs.
pub struct PricingCalculator {
    tables: Arc<PricingTables>,
    matchers: TrimMatcherChain,
}

impl PricingCalculator {
    pub fn new(tables: Arc<PricingTables>) -> Self {
        Self::with_matchers(tables, TrimMatcherChain::default())
    }

    pub fn with_matchers(tables: Arc<PricingTables>, matchers: TrimMatcherChain) -> Self {
        Self { tables, matchers }
    }

    pub fn tables(&self) -> &PricingTables {
        &self.tables
    }

    pub fn classify_segment(&self, make: &str) -> Segment {
        let (make, _) = self.tables.catalog.canonical_names(make, "");
        self.tables.catalog.classify_segment(make)
    }

    /// Catalog (or fallback) base price depreciated from `model_year` to `reference_year`.
    pub fn depreciated_base_value(
        &self,
        make: &str,
        model: &str,
        model_year: i32,
        reference_year: i32,
    ) -> f64 {
        self.base_value(make, model, model_year, reference_year).value
    }

    fn base_value(&self, make: &str, model: &str, model_year: i32, reference_year: i32) -> BaseValue {
        let catalog = &self.tables.catalog;
        let (make, model) = catalog.canonical_names(make, model);
        let segment = catalog.classify_segment(make);

        let (base, exact) = match catalog.lookup_base_price(segment, make, model) {
            Some(price) => (price, true),
            None => {
                let fallback = catalog.fallback_base_price(segment);
                debug!(make, model, %segment, fallback, "Catalog miss, using segment fallback");
                (fallback, false)
            }
        };

        let age = (reference_year - model_year).max(0);
        let policy = self.tables.segments.get(segment).depreciation;

        BaseValue {
            segment,
            value: policy.apply(base, age),
            exact,
        }
    }

    pub fn trim_multiplier(&self, trim: &str) -> f64 {
        let trim = trim.trim();
        if trim.is_empty() || trim.eq_ignore_ascii_case("base") {
            return 1.0;
        }

        match self.matchers.resolve(trim, &self.tables.trims) {
            Some((tier, multiplier)) => {
                debug!(trim, tier, multiplier, "Trim matched");
                multiplier
            }
            None => 1.0,
        }
    }

    pub fn condition_multiplier(&self, condition: &Condition) -> f64 {
        self.tables.conditions.multiplier(condition)
    }

    /// Linear mileage penalty, clamped to [0.3, 1.0].
    pub fn mileage_multiplier(&self, mileage: Option<f64>, segment: Segment) -> f64 {
        let mileage = match mileage {
            Some(m) if m.is_finite() && m > 0.0 => m,
            _ => return 1.0,
        };

        let policy = self.tables.segments.get(segment);
        let penalty = (mileage / policy.mileage_threshold) * policy.mileage_impact;
        (1.0 - penalty).clamp(MILEAGE_FLOOR, 1.0)
    }

    /// Price `query` as of `reference_year`.
    pub fn estimate(&self, query: &VehicleQuery, reference_year: i32) -> ValuationResult {
        let base = self.base_value(&query.make, &query.model, query.year, reference_year);
        let trim_multiplier = self.trim_multiplier(query.trim_str());
        let condition_multiplier = self.condition_multiplier(&query.condition);
        let mileage_multiplier = self.mileage_multiplier(query.mileage, base.segment);

        let value = base.value * trim_multiplier * condition_multiplier * mileage_multiplier;
        let range_fraction = self.tables.segments.get(base.segment).range_fraction;

        ValuationResult {
            predicted_value: money::round_to_hundred(value),
            price_range: PriceRange {
                low: money::round_whole(value * (1.0 - range_fraction)),
                high: money::round_whole(value * (1.0 + range_fraction)),
            },
            category: base.segment,
            factors: ValuationFactors {
                base_value: money::round_whole(base.value),
                trim_multiplier,
                condition_multiplier,
                mileage_multiplier,
            },
            confidence: if base.exact {
                Confidence::High
            } else {
                Confidence::Medium
            },
            source: ValuationSource::Catalog,
            market: None,
        }
    }

    /// Price `query` as of the current calendar year.
    pub fn estimate_now(&self, query: &VehicleQuery) -> ValuationResult {
        self.estimate(query, current_year())
    }
}

impl Default for PricingCalculator {
    fn default() -> Self {
        Self::new(Arc::new(PricingTables::standard()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const YEAR: i32 = 2024;

    fn calculator() -> PricingCalculator {
        PricingCalculator::default()
    }

    #[test]
    fn unknown_make_is_mainstream() {
        let calc = calculator();
        for make in ["Lada", "Yugo", "Kia", "Zastava"] {
            assert_eq!(calc.classify_segment(make), Segment::Mainstream);
        }
        assert_eq!(calc.classify_segment("Rolls-Royce"), Segment::SuperLuxury);
    }

    #[test]
    fn depreciation_non_increasing_with_floor() {
        let calc = calculator();
        let cases = [
            ("BMW", "M8", 130_000.0, 0.2),
            ("Ferrari", "F8", 280_000.0, 0.4),
            ("Toyota", "Camry", 27_000.0, 0.1),
            ("Lada", "Niva", 25_000.0, 0.1),
        ];

        for (make, model, base, floor) in cases {
            let mut previous = f64::INFINITY;
            for age in 0..60 {
                let value = calc.depreciated_base_value(make, model, YEAR - age, YEAR);
                assert!(value <= previous, "{make} {model} rose at age {age}");
                assert!(value >= base * floor, "{make} {model} fell below floor");
                previous = value;
            }
        }
    }

    #[test]
    fn depreciation_uses_segment_rate() {
        let calc = calculator();
        let value = calc.depreciated_base_value("Toyota", "Camry", YEAR - 1, YEAR);
        assert!((value - 27_000.0 * 0.88).abs() < 1e-6);

        let value = calc.depreciated_base_value("Porsche", "911", YEAR - 2, YEAR);
        assert!((value - 110_000.0 * 0.89 * 0.89).abs() < 1e-6);
    }

    #[test]
    fn trim_base_and_empty_are_neutral() {
        let calc = calculator();
        assert_eq!(calc.trim_multiplier("Base"), 1.0);
        assert_eq!(calc.trim_multiplier("base"), 1.0);
        assert_eq!(calc.trim_multiplier("BASE "), 1.0);
        assert_eq!(calc.trim_multiplier(""), 1.0);
        assert_eq!(calc.trim_multiplier("   "), 1.0);
    }

    #[test]
    fn trim_amg_case_insensitive() {
        let calc = calculator();
        let amg = calc.tables().trims.get("AMG").unwrap();
        assert_eq!(amg, 1.5);
        assert_eq!(calc.trim_multiplier("AMG"), amg);
        assert_eq!(calc.trim_multiplier("amg"), amg);
        assert_eq!(calc.trim_multiplier("Amg"), amg);
    }

    #[test]
    fn trim_fallback_chain() {
        let calc = calculator();
        assert_eq!(calc.trim_multiplier("Competition"), 1.6);
        assert_eq!(calc.trim_multiplier("black series"), 2.0);
        assert_eq!(calc.trim_multiplier("GTS"), 1.4);
        assert_eq!(calc.trim_multiplier("Touring"), 1.0);
    }

    #[test]
    fn condition_table() {
        let calc = calculator();
        assert_eq!(calc.condition_multiplier(&Condition::Excellent), 1.1);
        assert_eq!(calc.condition_multiplier(&Condition::Poor), 0.6);
        assert_eq!(
            calc.condition_multiplier(&Condition::Unknown("Mint".to_string())),
            1.0
        );
    }

    #[test]
    fn mileage_multiplier_is_clamped() {
        let calc = calculator();
        for segment in Segment::ALL {
            for mileage in [0.0, 1.0, 5_000.0, 30_000.0, 150_000.0, 1e6, 1e12] {
                let m = calc.mileage_multiplier(Some(mileage), segment);
                assert!((MILEAGE_FLOOR..=1.0).contains(&m), "{segment} {mileage} -> {m}");
            }
        }
    }

    #[test]
    fn mileage_multiplier_linear_penalty() {
        let calc = calculator();
        assert_eq!(calc.mileage_multiplier(None, Segment::Luxury), 1.0);
        assert_eq!(calc.mileage_multiplier(Some(0.0), Segment::Luxury), 1.0);
        // 50k of a 100k threshold at 0.5 impact
        let m = calc.mileage_multiplier(Some(50_000.0), Segment::Luxury);
        assert!((m - 0.75).abs() < 1e-12);
        assert_eq!(calc.mileage_multiplier(Some(60_000.0), Segment::Exotic), MILEAGE_FLOOR);
    }

    #[test]
    fn estimate_combines_factors() {
        let calc = calculator();
        let query = VehicleQuery::new("Toyota", "Camry", YEAR - 1)
            .with_trim("Limited")
            .with_mileage(15_000.0)
            .with_condition("Excellent");

        let result = calc.estimate(&query, YEAR);
        let expected = 27_000.0 * 0.88 * 1.15 * 1.1 * (1.0 - 0.1 * 0.3);

        assert_eq!(result.predicted_value, money::round_to_hundred(expected));
        assert_eq!(result.price_range.low, money::round_whole(expected * 0.9));
        assert_eq!(result.price_range.high, money::round_whole(expected * 1.1));
        assert_eq!(result.factors.trim_multiplier, 1.15);
        assert_eq!(result.factors.condition_multiplier, 1.1);
        assert_eq!(result.factors.base_value, dec!(23760));
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.source, ValuationSource::Catalog);
    }

    #[test]
    fn estimate_normalizes_names() {
        let calc = calculator();
        let query = VehicleQuery::new("honda", "cr-v", YEAR);
        let result = calc.estimate(&query, YEAR);
        assert_eq!(result.predicted_value, dec!(28000));
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn validate_rejects_bad_queries() {
        assert!(validate_query(&VehicleQuery::new("Toyota", "Camry", 2020)).is_ok());
        assert!(validate_query(&VehicleQuery::new(" ", "Camry", 2020)).is_err());
        assert!(validate_query(&VehicleQuery::new("Toyota", "", 2020)).is_err());
        assert!(validate_query(&VehicleQuery::new("Toyota", "Camry", 1700)).is_err());
        assert!(
            validate_query(&VehicleQuery::new("Toyota", "Camry", 2020).with_mileage(-5.0))
                .is_err()
        );
        assert!(
            validate_query(&VehicleQuery::new("Toyota", "Camry", 2020).with_mileage(f64::NAN))
                .is_err()
        );
    }
}
