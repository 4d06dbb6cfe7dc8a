//! Rounding rules shared by the calculators.
//!
//! Every rounding step in the engine goes through this module and uses
//! round-half-up (midpoints move away from zero). The engine never mixes
//! strategies.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places for a peso amount.
pub const CENTAVO_PLACES: u32 = 2;

/// Rounds a peso amount to centavos using half-up rounding.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_centavos;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// assert_eq!(round_centavos(dec("123.454")), dec("123.45"));
/// assert_eq!(round_centavos(dec("123.455")), dec("123.46"));
/// ```
pub fn round_centavos(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENTAVO_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Snaps a value to the nearest multiple of `step`, with exact midpoints
/// going to the higher multiple.
///
/// `step` must be positive; schedule validation guarantees this for every
/// step the calculators use.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::snap_to_multiple;
/// use rust_decimal::Decimal;
///
/// let step = Decimal::from(500);
/// assert_eq!(snap_to_multiple(Decimal::from(4749), step), Decimal::from(4500));
/// assert_eq!(snap_to_multiple(Decimal::from(4750), step), Decimal::from(5000));
/// ```
pub fn snap_to_multiple(value: Decimal, step: Decimal) -> Decimal {
    (value / step).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * step
}
