use serde::{Deserialize, Serialize};

use crate::quote::QuoteKind;

/// Top-level configuration for CarSeer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CarseerConfig {
    pub server: ServerConfig,
    pub pricing: PricingConfig,
    pub market: MarketConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
    /// Origins allowed by CORS (the web frontend).
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingConfig {
    /// Optional TOML file replacing the built-in pricing tables.
    pub tables_path: Option<String>,
}

/// Live market quote settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarketConfig {
    /// Master switch. When false every prediction uses the catalog path.
    pub enabled: bool,
    /// Per-provider timeout in seconds.
    pub provider_timeout_seconds: u64,
    /// Postal code used by listing searches when the query has none.
    pub default_zip: String,
    /// Listing search radius in miles.
    pub search_radius: u32,
    pub providers: Vec<ProviderConfig>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider_timeout_seconds: 10,
            default_zip: "90210".to_string(),
            search_radius: 100,
            providers: ProviderKind::ALL
                .into_iter()
                .map(ProviderConfig::new)
                .collect(),
        }
    }
}

/// External pricing and listing sources.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    MarketCheck,
    CarMd,
    Edmunds,
    Kbb,
    Nada,
    CarGurus,
    #[serde(rename = "cars_com")]
    CarsCom,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 7] = [
        ProviderKind::MarketCheck,
        ProviderKind::CarMd,
        ProviderKind::Edmunds,
        ProviderKind::Kbb,
        ProviderKind::Nada,
        ProviderKind::CarGurus,
        ProviderKind::CarsCom,
    ];

    /// Stable identifier used in quote provenance and logs.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::MarketCheck => "marketcheck",
            ProviderKind::CarMd => "carmd",
            ProviderKind::Edmunds => "edmunds",
            ProviderKind::Kbb => "kbb",
            ProviderKind::Nada => "nada",
            ProviderKind::CarGurus => "cargurus",
            ProviderKind::CarsCom => "cars_com",
        }
    }

    /// Guide-value sources quote a book value; the rest return listings.
    pub fn quote_kind(&self) -> QuoteKind {
        match self {
            ProviderKind::CarMd | ProviderKind::Edmunds | ProviderKind::Kbb | ProviderKind::Nada => {
                QuoteKind::Valuation
            }
            ProviderKind::MarketCheck | ProviderKind::CarGurus | ProviderKind::CarsCom => {
                QuoteKind::Listing
            }
        }
    }

    /// Environment variable holding the API key when the config does not override it.
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::MarketCheck => "MARKETCHECK_API_KEY",
            ProviderKind::CarMd => "CARMD_API_KEY",
            ProviderKind::Edmunds => "EDMUNDS_API_KEY",
            ProviderKind::Kbb => "KBB_API_KEY",
            ProviderKind::Nada => "NADA_API_KEY",
            ProviderKind::CarGurus => "CARGURUS_API_KEY",
            ProviderKind::CarsCom => "CARS_COM_API_KEY",
        }
    }
}

/// Configuration for a single provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Override the provider's default endpoint URL.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Override the environment variable the API key is read from.
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            enabled: true,
            endpoint: None,
            api_key_env: None,
        }
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.kind.default_api_key_env())
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_carseer_config() {
        let config = CarseerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: CarseerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn default_config_enables_all_providers() {
        let market = MarketConfig::default();
        assert_eq!(market.providers.len(), 7);
        assert!(market.providers.iter().all(|p| p.enabled));
        assert_eq!(market.provider_timeout_seconds, 10);
    }

    #[test]
    fn listing_and_valuation_sources() {
        assert_eq!(ProviderKind::Kbb.quote_kind(), QuoteKind::Valuation);
        assert_eq!(ProviderKind::CarsCom.quote_kind(), QuoteKind::Listing);
        assert_eq!(ProviderKind::MarketCheck.quote_kind(), QuoteKind::Listing);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: CarseerConfig = toml::from_str("").unwrap();
        assert_eq!(config, CarseerConfig::default());
        assert_eq!(config.server.bind, "0.0.0.0:8000");
    }

    #[test]
    fn config_from_toml() {
        let toml_str = r#"
[server]
bind = "127.0.0.1:9000"
cors_origins = ["https://carseer.example"]

[pricing]
tables_path = "config/pricing.toml"

[market]
enabled = true
provider_timeout_seconds = 5

[[market.providers]]
kind = "kbb"

[[market.providers]]
kind = "cars_com"
enabled = false
endpoint = "http://localhost:8081/listings"
api_key_env = "CARS_KEY"
"#;

        let config: CarseerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(
            config.pricing.tables_path.as_deref(),
            Some("config/pricing.toml")
        );
        assert_eq!(config.market.provider_timeout_seconds, 5);
        assert_eq!(config.market.default_zip, "90210");
        assert_eq!(config.market.providers.len(), 2);
        assert!(config.market.providers[0].enabled);
        assert_eq!(config.market.providers[0].api_key_env(), "KBB_API_KEY");
        assert_eq!(config.market.providers[1].kind, ProviderKind::CarsCom);
        assert!(!config.market.providers[1].enabled);
        assert_eq!(config.market.providers[1].api_key_env(), "CARS_KEY");
    }

    #[test]
    fn provider_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ProviderKind::MarketCheck).unwrap(),
            "\"marketcheck\""
        );
        assert_eq!(
            serde_json::to_string(&ProviderKind::CarsCom).unwrap(),
            "\"cars_com\""
        );
        for kind in ProviderKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }
}
