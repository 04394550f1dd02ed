//! Money rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to cents, half up, always carrying two decimal places.
///
/// Amounts handled here are never negative, so "away from zero" and
/// "half up" agree.
///
/// # Examples
///
/// ```
/// use barista_pay::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("2.345").unwrap()), Decimal::from_str("2.35").unwrap());
/// assert_eq!(round_money(Decimal::from_str("2.344").unwrap()), Decimal::from_str("2.34").unwrap());
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
