pub mod config;
pub mod quote;
pub mod segment;
pub mod valuation;
pub mod vehicle;

pub use config::{CarseerConfig, MarketConfig, PricingConfig, ProviderConfig, ProviderKind, ServerConfig};
pub use quote::{MarketEstimate, Quote, QuoteKind, QuoteSet};
pub use segment::Segment;
pub use valuation::{Confidence, PriceRange, ValuationFactors, ValuationResult, ValuationSource};
pub use vehicle::{Condition, VehicleQuery};
