use carseer_models::{MarketEstimate, QuoteSet};
use carseer_pricing::money::{round_to_hundred, round_whole};
use rust_decimal::Decimal;

use crate::error::MarketError;

/// Reduce a set of quotes to median, mean, and sample standard deviation.
///
/// Non-finite, non-positive and implausibly large quotes are discarded
/// first. The range is `median ± std_dev` with the low end clamped at zero.
pub fn reconcile(quotes: &QuoteSet) -> Result<MarketEstimate, MarketError> {
    reconcile_priced(quotes).map(|(estimate, _)| estimate)
}

/// [`reconcile`], plus the market price: the unrounded median taken straight
/// to the nearest 100.
pub fn reconcile_priced(quotes: &QuoteSet) -> Result<(MarketEstimate, Decimal), MarketError> {
    let usable: QuoteSet = quotes.iter().filter(|q| q.is_usable()).cloned().collect();

    if usable.is_empty() {
        return Err(MarketError::NoData);
    }

    let mut values = usable.values();
    values.sort_by(f64::total_cmp);

    let median = median(&values);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let std_dev = sample_std_dev(&values, mean);

    let estimate = MarketEstimate {
        median: round_whole(median),
        mean: round_whole(mean),
        std_dev: round_whole(std_dev),
        low: round_whole((median - std_dev).max(0.0)),
        high: round_whole(median + std_dev),
        sample_size: values.len(),
        sources: usable.source_counts(),
    };
    Ok((estimate, round_to_hundred(median)))
}

/// `values` must be sorted and non-empty.
fn median(values: &[f64]) -> f64 {
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}
