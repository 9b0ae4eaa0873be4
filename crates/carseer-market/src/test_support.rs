//! Scripted quote providers for exercising the orchestrator without network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use carseer_models::{Quote, VehicleQuery};

use crate::error::MarketError;
use crate::provider::QuoteProvider;

/// How a `ScriptedProvider` responds to `fetch_quotes`.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Return these prices as quotes.
    Quotes(Vec<f64>),
    /// Fail as if the provider returned this HTTP status.
    Status(u16),
    /// Sleep past any sensible timeout before answering.
    Hang(Duration),
    /// Panic inside the provider task.
    Panic,
}

/// A provider that follows a fixed script and counts its calls.
pub struct ScriptedProvider {
    name: String,
    behavior: Behavior,
    trims: Vec<String>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            trims: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn quoting(name: &str, values: &[f64]) -> Self {
        Self::new(name, Behavior::Quotes(values.to_vec()))
    }

    pub fn failing(name: &str) -> Self {
        Self::new(name, Behavior::Status(503))
    }

    pub fn hanging(name: &str) -> Self {
        Self::new(name, Behavior::Hang(Duration::from_secs(3600)))
    }

    pub fn panicking(name: &str) -> Self {
        Self::new(name, Behavior::Panic)
    }

    pub fn with_trims(mut self, trims: &[&str]) -> Self {
        self.trims = trims.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Number of `fetch_quotes` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_quotes(&self, _query: &VehicleQuery) -> Result<Vec<Quote>, MarketError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            Behavior::Quotes(values) => Ok(values
                .iter()
                .map(|v| Quote::valuation(self.name.as_str(), *v))
                .collect()),
            Behavior::Status(status) => Err(MarketError::Status {
                provider: self.name.clone(),
                status: *status,
            }),
            Behavior::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Vec::new())
            }
            Behavior::Panic => panic!("scripted provider {} panicked", self.name),
        }
    }

    async fn discover_trims(&self, _make: &str, _model: &str) -> Result<Vec<String>, MarketError> {
        match &self.behavior {
            Behavior::Status(status) => Err(MarketError::Status {
                provider: self.name.clone(),
                status: *status,
            }),
            Behavior::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Vec::new())
            }
            _ => Ok(self.trims.clone()),
        }
    }
}
