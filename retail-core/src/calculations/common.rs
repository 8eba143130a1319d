//! Common utility functions for money calculations.
//!
//! This module provides shared functionality used by the cart and purchase
//! order calculators, including presentation rounding and input clamping.

use rust_decimal::{Decimal, RoundingStrategy};

/// One hundred, the divisor that turns a percentage into a fraction.
pub const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds a monetary value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero. Only use this when a
/// value is about to be shown or recorded; intermediate results keep full
/// precision.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use retail_core::calculations::common::round_money;
///
/// assert_eq!(round_money(dec!(14.404)), dec!(14.40));
/// assert_eq!(round_money(dec!(14.405)), dec!(14.41));
/// assert_eq!(round_money(dec!(-5.605)), dec!(-5.61)); // Away from zero
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a percentage into the closed range `[0, 100]`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use retail_core::calculations::common::clamp_percent;
///
/// assert_eq!(clamp_percent(dec!(150)), dec!(100));
/// assert_eq!(clamp_percent(dec!(-5)), dec!(0));
/// assert_eq!(clamp_percent(dec!(12.5)), dec!(12.5));
/// ```
pub fn clamp_percent(percent: Decimal) -> Decimal {
    percent.clamp(Decimal::ZERO, ONE_HUNDRED)
}

/// Returns `value`, or zero when `value` is negative.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use retail_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(0.08)), dec!(0.08));
/// assert_eq!(non_negative(dec!(-0.08)), dec!(0));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
