use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Convert a computed amount to a Decimal. NaN becomes zero; values outside
/// Decimal's range saturate at `Decimal::MAX` / `Decimal::MIN`.
pub fn to_decimal(value: f64) -> Decimal {
    if value.is_nan() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or(if value > 0.0 {
        Decimal::MAX
    } else {
        Decimal::MIN
    })
}

/// Round to whole currency units, ties to even.
pub fn round_whole(value: f64) -> Decimal {
    to_decimal(value).round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

/// Round to the nearest 100 currency units, ties to even.
pub fn round_to_hundred(value: f64) -> Decimal {
    hundreds(to_decimal(value))
}

/// Decimal variant of [`round_to_hundred`].
pub fn hundreds(value: Decimal) -> Decimal {
    (value / Decimal::ONE_HUNDRED).round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        * Decimal::ONE_HUNDRED
}
