//! Lenient parsing of numbers typed into forms.
//!
//! A checkout must never fail because a field holds text that is not a
//! number. Every parser here treats unparseable input as zero and records a
//! warning instead of returning an error.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

use crate::calculations::common::clamp_percent;

/// Normalizes input for number parsing: trims whitespace, drops thousands
/// separators and a leading currency symbol.
fn normalize(s: &str) -> String {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
    trimmed.replace(',', "")
}

/// Parses a monetary amount such as a price or the cash tendered.
///
/// Empty input is zero without a warning; non-numeric input is zero with a
/// warning.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use retail_core::input::parse_amount;
///
/// assert_eq!(parse_amount("$1,234.56"), dec!(1234.56));
/// assert_eq!(parse_amount(""), dec!(0));
/// assert_eq!(parse_amount("twenty"), dec!(0));
/// ```
pub fn parse_amount(s: &str) -> Decimal {
    let normalized = normalize(s);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    normalized.parse().unwrap_or_else(|e| {
        warn!(input = %s, "invalid amount treated as zero: {}", e);
        Decimal::ZERO
    })
}

/// Parses a discount percentage and clamps it to `[0, 100]`.
///
/// A trailing `%` is accepted.
pub fn parse_percent(s: &str) -> Decimal {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed);
    clamp_percent(parse_amount(trimmed))
}

/// Parses a whole-number quantity.
///
/// Signed so that callers can tell a decrement past zero apart from a
/// missing value; fractional input is truncated toward zero.
///
/// # Examples
///
/// ```
/// use retail_core::input::parse_quantity;
///
/// assert_eq!(parse_quantity("3"), 3);
/// assert_eq!(parse_quantity("-1"), -1);
/// assert_eq!(parse_quantity("2.9"), 2);
/// assert_eq!(parse_quantity("lots"), 0);
/// ```
pub fn parse_quantity(s: &str) -> i64 {
    let normalized = normalize(s);
    if normalized.is_empty() {
        return 0;
    }
    if let Ok(quantity) = normalized.parse::<i64>() {
        return quantity;
    }
    match normalized.parse::<Decimal>() {
        Ok(d) => d.trunc().to_i64().unwrap_or_else(|| {
            warn!(input = %s, "quantity out of range treated as zero");
            0
        }),
        Err(e) => {
            warn!(input = %s, "invalid quantity treated as zero: {}", e);
            0
        }
    }
}
