use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adjustments::{AdjustmentTable, ConditionTable};
use crate::catalog::SegmentCatalog;
use crate::error::PricingError;
use crate::policy::PolicyTable;
use crate::standard;

/// Read-only configuration injected into the `PricingCalculator`.
///
/// Built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingTables {
    pub catalog: SegmentCatalog,
    pub segments: PolicyTable,
    pub trims: AdjustmentTable,
    #[serde(default)]
    pub conditions: ConditionTable,
}

impl PricingTables {
    /// The built-in catalog and multiplier tables.
    pub fn standard() -> Self {
        Self {
            catalog: SegmentCatalog::from_parts(
                standard::catalog_prices(),
                standard::fallback_prices(),
            ),
            segments: PolicyTable::from_parts(standard::segment_policies()),
            trims: AdjustmentTable::from_parts(standard::trim_adjustments()),
            conditions: standard::conditions(),
        }
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, PricingError> {
        let tables: PricingTables = toml::from_str(toml_str)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PricingError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        self.catalog.validate()?;
        self.segments.validate()?;
        self.trims.validate()?;
        self.conditions.validate()
    }
}

impl Default for PricingTables {
    fn default() -> Self {
        Self::standard()
    }
}
