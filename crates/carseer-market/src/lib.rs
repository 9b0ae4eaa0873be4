//! Live market quotes: provider clients, quote reconciliation, and the
//! orchestrator that blends them with the catalog estimate.

pub mod error;
pub mod http;
pub mod orchestrator;
pub mod parser;
pub mod provider;
pub mod reconciler;
pub mod trims;

pub mod test_support;

pub use error::MarketError;
pub use http::HttpQuoteProvider;
pub use orchestrator::Orchestrator;
pub use provider::QuoteProvider;
pub use reconciler::{reconcile, reconcile_priced};
