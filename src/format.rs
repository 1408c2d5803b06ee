use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round a rate for output.
///
/// With `decimals` set, the value is rounded half away from zero. Values
/// outside the decimal range are returned unchanged.
pub fn round_rate(value: f64, decimals: Option<u32>) -> f64 {
    let Some(dp) = decimals else {
        return value;
    };
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Render a rate as text.
///
/// Without `decimals` the shortest representation that round-trips is used.
/// With `decimals`, the value is rounded (half away from zero) and trailing
/// zeros are stripped (`Decimal::normalize()`).
pub fn format_rate(value: f64, decimals: Option<u32>) -> String {
    let Some(dp) = decimals else {
        return value.to_string();
    };
    match Decimal::from_f64(value) {
        Some(d) => d
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
            .to_string(),
        None => format!("{value:.prec$}", prec = dp as usize),
    }
}
