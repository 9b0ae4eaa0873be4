use async_trait::async_trait;
use carseer_models::{MarketConfig, ProviderConfig, ProviderKind, Quote, QuoteKind, VehicleQuery};
use tracing::debug;

use crate::error::MarketError;
use crate::parser::{parse_quotes, parse_trim_facets};
use crate::provider::QuoteProvider;

/// Listing searches cap mileage at the vehicle's mileage plus this margin.
const MILEAGE_MARGIN: f64 = 15_000.0;
/// Mileage cap when the query has no mileage.
const DEFAULT_MAX_MILEAGE: f64 = 100_000.0;

pub fn default_endpoint(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::MarketCheck => "https://mc-api.marketcheck.com/v2/search/car/active",
        ProviderKind::CarMd => "https://api.carmd.com/v3.0/value",
        ProviderKind::Edmunds => "https://api.edmunds.com/api/tmv/v2/calculateusedtmv",
        ProviderKind::Kbb => "https://api.kbb.com/v1/values",
        ProviderKind::Nada => "https://api.nadaguides.com/v2/values",
        ProviderKind::CarGurus => "https://api.cargurus.com/v2/listings/search",
        ProviderKind::CarsCom => "https://api.cars.com/v2/listings",
    }
}

/// A REST quote source: one GET per valuation, parsed per provider kind.
pub struct HttpQuoteProvider {
    kind: ProviderKind,
    endpoint: String,
    api_key: String,
    default_zip: String,
    search_radius: u32,
    client: reqwest::Client,
}

impl HttpQuoteProvider {
    pub fn new(
        kind: ProviderKind,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        let market = MarketConfig::default();
        Self {
            kind,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            default_zip: market.default_zip,
            search_radius: market.search_radius,
            client,
        }
    }

    /// Build from config, reading the API key from the environment.
    pub fn from_config(
        config: &ProviderConfig,
        market: &MarketConfig,
        client: reqwest::Client,
    ) -> Result<Self, MarketError> {
        let key_env = config.api_key_env();
        let api_key = std::env::var(key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| MarketError::MissingApiKey(key_env.to_string()))?;

        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| default_endpoint(config.kind).to_string());

        Ok(Self::new(config.kind, endpoint, api_key, client)
            .with_search_area(market.default_zip.clone(), market.search_radius))
    }

    pub fn with_search_area(mut self, default_zip: impl Into<String>, search_radius: u32) -> Self {
        self.default_zip = default_zip.into();
        self.search_radius = search_radius;
        self
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query string for a quote request.
    ///
    /// Guide-value sources get the full vehicle description; listing sources
    /// get a local search around the vehicle's postal code.
    pub fn query_params(&self, query: &VehicleQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("api_key", self.api_key.clone()),
            ("make", query.make.clone()),
            ("model", query.model.clone()),
            ("year", query.year.to_string()),
        ];

        match self.kind.quote_kind() {
            QuoteKind::Valuation => {
                params.push(("mileage", query.mileage.unwrap_or(0.0).to_string()));
                params.push(("condition", query.condition.as_str().to_string()));
                params.push(("trim", query.trim_str().to_string()));
            }
            QuoteKind::Listing => {
                let zip = query
                    .zip_code
                    .as_deref()
                    .filter(|zip| !zip.trim().is_empty())
                    .unwrap_or(self.default_zip.as_str());
                let max_mileage = match query.mileage {
                    Some(m) if m > 0.0 => m + MILEAGE_MARGIN,
                    _ => DEFAULT_MAX_MILEAGE,
                };
                params.push(("zip", zip.to_string()));
                params.push(("radius", self.search_radius.to_string()));
                params.push(("maxMileage", max_mileage.to_string()));
            }
        }

        params
    }

    /// GET the endpoint and decode its JSON body. The request URL carries the
    /// API key, so it is stripped from transport errors.
    async fn get_json(&self, params: &[(&str, String)]) -> Result<serde_json::Value, MarketError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(params)
            .send()
            .await
            .map_err(|e| MarketError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Status {
                provider: self.kind.name().to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MarketError::Http(e.without_url()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl QuoteProvider for HttpQuoteProvider {
    fn name(&self) -> &str {
        self.kind.name()
    }

    async fn fetch_quotes(&self, query: &VehicleQuery) -> Result<Vec<Quote>, MarketError> {
        let params = self.query_params(query);
        let body = self.get_json(&params).await?;
        let quotes = parse_quotes(self.kind, &body)?;
        debug!(provider = self.kind.name(), quotes = quotes.len(), "Parsed provider response");
        Ok(quotes)
    }

    async fn discover_trims(&self, make: &str, model: &str) -> Result<Vec<String>, MarketError> {
        if self.kind != ProviderKind::MarketCheck {
            return Ok(Vec::new());
        }

        let params = [
            ("api_key", self.api_key.clone()),
            ("make", make.to_string()),
            ("model", model.to_string()),
            ("facets", "trim".to_string()),
            ("rows", "0".to_string()),
        ];
        let body = self.get_json(&params).await?;
        Ok(parse_trim_facets(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(kind: ProviderKind) -> HttpQuoteProvider {
        HttpQuoteProvider::new(kind, default_endpoint(kind), "test-key", reqwest::Client::new())
    }

    fn param<'a>(params: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn valuation_params_describe_vehicle() {
        let query = VehicleQuery::new("Toyota", "Camry", 2020)
            .with_trim("XSE")
            .with_condition("Excellent");
        let params = provider(ProviderKind::Kbb).query_params(&query);

        assert_eq!(param(&params, "api_key"), Some("test-key"));
        assert_eq!(param(&params, "year"), Some("2020"));
        assert_eq!(param(&params, "mileage"), Some("0"));
        assert_eq!(param(&params, "condition"), Some("Excellent"));
        assert_eq!(param(&params, "trim"), Some("XSE"));
        assert_eq!(param(&params, "zip"), None);
    }

    #[test]
    fn listing_params_default_search_area() {
        let query = VehicleQuery::new("Honda", "Civic", 2019);
        let params = provider(ProviderKind::CarGurus).query_params(&query);

        assert_eq!(param(&params, "zip"), Some("90210"));
        assert_eq!(param(&params, "radius"), Some("100"));
        assert_eq!(param(&params, "maxMileage"), Some("100000"));
        assert_eq!(param(&params, "condition"), None);
    }

    #[test]
    fn listing_params_follow_query() {
        let query = VehicleQuery::new("Honda", "Civic", 2019)
            .with_mileage(40_000.0)
            .with_zip_code("10001");
        let params = provider(ProviderKind::CarsCom)
            .with_search_area("60601", 50)
            .query_params(&query);

        assert_eq!(param(&params, "zip"), Some("10001"));
        assert_eq!(param(&params, "radius"), Some("50"));
        assert_eq!(param(&params, "maxMileage"), Some("55000"));
    }

    #[test]
    fn missing_api_key_is_reported() {
        let mut config = ProviderConfig::new(ProviderKind::Nada);
        config.api_key_env = Some("CARSEER_TEST_UNSET_NADA_KEY".to_string());

        let result =
            HttpQuoteProvider::from_config(&config, &MarketConfig::default(), reqwest::Client::new());
        assert!(
            matches!(result, Err(MarketError::MissingApiKey(ref var)) if var == "CARSEER_TEST_UNSET_NADA_KEY")
        );
    }

    #[test]
    fn endpoint_override() {
        let mut config = ProviderConfig::new(ProviderKind::Kbb);
        config.endpoint = Some("http://127.0.0.1:9/values".to_string());
        config.api_key_env = Some("CARSEER_TEST_KBB_KEY".to_string());
        std::env::set_var("CARSEER_TEST_KBB_KEY", "kbb-secret");

        let provider =
            HttpQuoteProvider::from_config(&config, &MarketConfig::default(), reqwest::Client::new())
                .unwrap();
        assert_eq!(provider.endpoint(), "http://127.0.0.1:9/values");
        assert_eq!(provider.name(), "kbb");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_http_error() {
        let provider = HttpQuoteProvider::new(
            ProviderKind::Kbb,
            "http://127.0.0.1:9/values",
            "key",
            reqwest::Client::new(),
        );
        let result = provider
            .fetch_quotes(&VehicleQuery::new("Toyota", "Camry", 2020))
            .await;
        assert!(matches!(result, Err(MarketError::Http(_))));
    }

    #[tokio::test]
    async fn transport_errors_do_not_leak_api_key() {
        let provider = HttpQuoteProvider::new(
            ProviderKind::Kbb,
            "http://127.0.0.1:9/values",
            "SUPERSECRETKEY",
            reqwest::Client::new(),
        );
        let err = provider
            .fetch_quotes(&VehicleQuery::new("Toyota", "Camry", 2020))
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("SUPERSECRETKEY"));
        assert!(!format!("{err:?}").contains("SUPERSECRETKEY"));

        let mut trims_provider = provider;
        trims_provider.kind = ProviderKind::MarketCheck;
        let err = trims_provider.discover_trims("Toyota", "Camry").await.unwrap_err();
        assert!(!err.to_string().contains("SUPERSECRETKEY"));
    }
}
