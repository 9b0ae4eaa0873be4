//! Provider response bodies to quotes.
//!
//! Each provider family reports prices under different keys:
//! - KBB: top-level `retail` and `privateParty`
//! - NADA: top-level `retail`
//! - Edmunds: `tmv.usedTmvRetail` and `tmv.usedPrivateParty`
//! - CarMD: `data.retail`
//! - CarGurus, Cars.com, MarketCheck: `listings[].price`
//!
//! Missing, zero, non-numeric and out-of-range prices are skipped rather than
//! treated as errors.

use carseer_models::{ProviderKind, Quote, QuoteKind};
use serde_json::Value;

use crate::error::MarketError;

/// Extract every usable price from a provider response.
pub fn parse_quotes(kind: ProviderKind, body: &Value) -> Result<Vec<Quote>, MarketError> {
    if !body.is_object() {
        return Err(MarketError::Parse(format!(
            "{} response is not a JSON object",
            kind.name()
        )));
    }

    let prices: Vec<f64> = match kind {
        ProviderKind::Kbb => fields(body, &["/retail", "/privateParty"]),
        ProviderKind::Nada => fields(body, &["/retail"]),
        ProviderKind::Edmunds => fields(body, &["/tmv/usedTmvRetail", "/tmv/usedPrivateParty"]),
        ProviderKind::CarMd => fields(body, &["/data/retail"]),
        ProviderKind::CarGurus | ProviderKind::CarsCom | ProviderKind::MarketCheck => {
            listing_prices(body)
        }
    };

    let source = kind.name();
    Ok(prices
        .into_iter()
        .map(|value| match kind.quote_kind() {
            QuoteKind::Valuation => Quote::valuation(source, value),
            QuoteKind::Listing => Quote::listing(source, value),
        })
        .collect())
}

/// Trim names from a MarketCheck faceted search (`facets.trim[].item`).
pub fn parse_trim_facets(body: &Value) -> Vec<String> {
    body.pointer("/facets/trim")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|facet| facet.get("item").and_then(Value::as_str))
                .map(str::trim)
                .filter(|trim| !trim.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn fields(body: &Value, pointers: &[&str]) -> Vec<f64> {
    pointers
        .iter()
        .filter_map(|pointer| body.pointer(pointer).and_then(price))
        .collect()
}

fn listing_prices(body: &Value) -> Vec<f64> {
    body.get("listings")
        .and_then(Value::as_array)
        .map(|listings| {
            listings
                .iter()
                .filter_map(|listing| listing.get("price").and_then(price))
                .collect()
        })
        .unwrap_or_default()
}

/// Numbers, or strings such as "$21,500". Zero, negative and absurdly
/// large prices are dropped.
fn price(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| !matches!(c, '$' | ',' | ' ')).collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    }?;

    Quote::is_usable_value(parsed).then_some(parsed)
}
