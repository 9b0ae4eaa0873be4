//! Deterministic used-car pricing: segment catalog, depreciation, and
//! trim/condition/mileage adjustments.

pub mod adjustments;
pub mod calculator;
pub mod catalog;
pub mod error;
pub mod money;
pub mod policy;
pub mod standard;
pub mod tables;
pub mod trim;

pub use calculator::{current_year, validate_query, PricingCalculator};
pub use catalog::SegmentCatalog;
pub use error::PricingError;
pub use policy::{DepreciationPolicy, PolicyTable, SegmentPolicy};
pub use tables::PricingTables;
pub use trim::{TrimMatcher, TrimMatcherChain};
