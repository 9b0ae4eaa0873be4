use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned status {status}")]
    Status { provider: String, status: u16 },

    #[error("Provider timed out after {0} seconds")]
    Timeout(u64),

    #[error("Provider response parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No market data available")]
    NoData,

    #[error("Missing API key: {0} is not set")]
    MissingApiKey(String),
}
