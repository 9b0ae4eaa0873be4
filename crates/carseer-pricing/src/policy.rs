use std::collections::BTreeMap;

use carseer_models::Segment;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// Exponential yearly depreciation with a hard floor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DepreciationPolicy {
    /// Fraction of value lost per year, 0 < rate < 1.
    pub rate: f64,
    /// Minimum value as a fraction of the base price, 0 < floor <= 1.
    pub floor_fraction: f64,
}

impl DepreciationPolicy {
    /// `base * (1 - rate)^age`, never below `base * floor_fraction`.
    pub fn apply(&self, base: f64, age: i32) -> f64 {
        let depreciated = base * (1.0 - self.rate).powi(age.max(0));
        depreciated.max(base * self.floor_fraction)
    }
}

/// Every per-segment pricing parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SegmentPolicy {
    pub depreciation: DepreciationPolicy,
    /// Mileage at which the full `mileage_impact` penalty applies.
    pub mileage_threshold: f64,
    pub mileage_impact: f64,
    /// Half-width of the reported price range as a fraction of the estimate.
    pub range_fraction: f64,
}

impl SegmentPolicy {
    /// Row used for any segment missing from the table.
    pub const DEFAULT: SegmentPolicy = SegmentPolicy {
        depreciation: DepreciationPolicy {
            rate: 0.12,
            floor_fraction: 0.1,
        },
        mileage_threshold: 150_000.0,
        mileage_impact: 0.3,
        range_fraction: 0.10,
    };

    fn validate(&self, segment: Segment) -> Result<(), PricingError> {
        let d = &self.depreciation;
        if !(d.rate > 0.0 && d.rate < 1.0) {
            return Err(PricingError::InvalidTable(format!(
                "{segment} depreciation rate must be in (0, 1), got {}",
                d.rate
            )));
        }
        if !(d.floor_fraction > 0.0 && d.floor_fraction <= 1.0) {
            return Err(PricingError::InvalidTable(format!(
                "{segment} floor fraction must be in (0, 1], got {}",
                d.floor_fraction
            )));
        }
        if !(self.mileage_threshold > 0.0) || !(self.mileage_impact >= 0.0) {
            return Err(PricingError::InvalidTable(format!(
                "{segment} mileage parameters must be positive"
            )));
        }
        if !(0.0..1.0).contains(&self.range_fraction) {
            return Err(PricingError::InvalidTable(format!(
                "{segment} range fraction must be in [0, 1), got {}",
                self.range_fraction
            )));
        }
        Ok(())
    }
}

/// One `SegmentPolicy` per segment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PolicyTable {
    rows: BTreeMap<Segment, SegmentPolicy>,
}

impl PolicyTable {
    pub fn new(rows: BTreeMap<Segment, SegmentPolicy>) -> Result<Self, PricingError> {
        let table = Self { rows };
        table.validate()?;
        Ok(table)
    }

    pub(crate) fn from_parts(rows: BTreeMap<Segment, SegmentPolicy>) -> Self {
        Self { rows }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        self.rows
            .iter()
            .try_for_each(|(segment, policy)| policy.validate(*segment))
    }

    pub fn get(&self, segment: Segment) -> SegmentPolicy {
        self.rows
            .get(&segment)
            .copied()
            .unwrap_or(SegmentPolicy::DEFAULT)
    }
}
