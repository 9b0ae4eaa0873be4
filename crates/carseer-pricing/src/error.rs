use carseer_models::Segment;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Make {make} is listed in both {first} and {second}")]
    DuplicateMake {
        make: String,
        first: Segment,
        second: Segment,
    },

    #[error("Invalid pricing table: {0}")]
    InvalidTable(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
