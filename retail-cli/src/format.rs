use retail_core::calculations::common::round_money;
use rust_decimal::Decimal;

/// Inserts a comma between every group of three digits.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats a monetary amount for display: two decimal places (half away
/// from zero), comma thousands separators and the currency symbol.
///
/// Multi-letter symbols such as ISO codes are separated by a space.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use retail_cli::format::format_currency;
///
/// assert_eq!(format_currency(dec!(1239.84), "$"), "$1,239.84");
/// assert_eq!(format_currency(dec!(-42.445), "$"), "-$42.45");
/// assert_eq!(format_currency(dec!(16965), "CHF"), "CHF 16,965.00");
/// ```
pub fn format_currency(
    amount: Decimal,
    symbol: &str,
) -> String {
    let rounded = round_money(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let separator = if symbol.chars().count() > 1 { " " } else { "" };

    format!("{sign}{symbol}{separator}{}.{fraction}", group_thousands(whole))
}

/// Formats a percentage without trailing zeros, e.g. `8.875%`.
pub fn format_percent(percent: Decimal) -> String {
    format!("{}%", percent.normalize())
}
