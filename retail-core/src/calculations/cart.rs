//! Point-of-sale cart pricing.
//!
//! Prices a cart from its line items, a percentage discount and a tax rate.
//!
//! # Calculation Order
//!
//! | Step | Value | Formula |
//! |------|-------|---------|
//! | 1    | Subtotal | Σ unit price × quantity |
//! | 2    | Discount amount | Subtotal × discount % / 100 |
//! | 3    | Taxable amount | Subtotal − discount amount |
//! | 4    | Tax amount | Taxable amount × tax rate |
//! | 5    | Total | Taxable amount + tax amount |
//!
//! Tax is always charged on the discounted amount. Every step keeps full
//! precision; call [`CartTotals::rounded`] when the values are about to be
//! displayed or written to a receipt.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use retail_core::calculations::{CartLine, compute_change, compute_totals};
//!
//! let lines = vec![CartLine::new(dec!(100.00), 2).unwrap()];
//! let totals = compute_totals(&lines, dec!(10), dec!(0.08));
//!
//! assert_eq!(totals.subtotal, dec!(200.00));
//! assert_eq!(totals.discount_amount, dec!(20.00));
//! assert_eq!(totals.tax_amount, dec!(14.40));
//! assert_eq!(totals.total, dec!(194.40));
//!
//! assert_eq!(compute_change(totals.total, dec!(200.00)), dec!(5.60));
//! ```

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::calculations::common::{ONE_HUNDRED, clamp_percent, non_negative, round_money};

/// Errors raised when building a [`CartLine`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartLineError {
    /// Unit prices cannot be negative.
    #[error("unit price must be non-negative, got {0}")]
    NegativeUnitPrice(Decimal),

    /// A cart line always holds at least one unit.
    #[error("cart line quantity must be at least 1")]
    ZeroQuantity,
}

/// One priced row of a cart.
///
/// The fields are private so that a line can only exist with a
/// non-negative price and a quantity of at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartLine {
    unit_price: Decimal,
    quantity: u32,
}

impl CartLine {
    /// Creates a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`CartLineError::NegativeUnitPrice`] for a price below zero and
    /// [`CartLineError::ZeroQuantity`] for a quantity of zero.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use retail_core::calculations::{CartLine, CartLineError};
    ///
    /// assert!(CartLine::new(dec!(249.00), 1).is_ok());
    /// assert_eq!(CartLine::new(dec!(249.00), 0), Err(CartLineError::ZeroQuantity));
    /// ```
    pub fn new(
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<Self, CartLineError> {
        if unit_price < Decimal::ZERO {
            return Err(CartLineError::NegativeUnitPrice(unit_price));
        }
        if quantity == 0 {
            return Err(CartLineError::ZeroQuantity);
        }
        Ok(Self {
            unit_price,
            quantity,
        })
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price × quantity, unrounded.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Returns a copy of this line holding `quantity` units.
    pub fn with_quantity(
        self,
        quantity: NonZeroU32,
    ) -> Self {
        Self {
            quantity: quantity.get(),
            ..self
        }
    }
}

/// Derived cart totals.
///
/// Produced by [`compute_totals`]; never stored alongside the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CartTotals {
    /// Sum of every line total before discount.
    pub subtotal: Decimal,

    /// Subtotal × discount percentage.
    pub discount_amount: Decimal,

    /// Subtotal less the discount; the base for tax.
    pub taxable_amount: Decimal,

    /// Taxable amount × tax rate.
    pub tax_amount: Decimal,

    /// Taxable amount plus tax.
    pub total: Decimal,
}

impl CartTotals {
    /// Rounds every field to two decimal places for presentation.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use retail_core::calculations::{CartLine, compute_totals};
    ///
    /// let lines = vec![CartLine::new(dec!(849.00), 1).unwrap()];
    /// let totals = compute_totals(&lines, dec!(5), dec!(0.08)).rounded();
    ///
    /// assert_eq!(totals.discount_amount, dec!(42.45));
    /// assert_eq!(totals.tax_amount, dec!(64.52));
    /// assert_eq!(totals.total, dec!(871.07));
    /// ```
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round_money(self.subtotal),
            discount_amount: round_money(self.discount_amount),
            taxable_amount: round_money(self.taxable_amount),
            tax_amount: round_money(self.tax_amount),
            total: round_money(self.total),
        }
    }
}

/// Computes the totals for a cart.
///
/// # Arguments
///
/// * `lines` - The cart lines; may be empty, in which case every total is zero
/// * `discount_percent` - Percentage discount, clamped to `[0, 100]`
/// * `tax_rate` - Tax rate as a fraction (e.g. `0.08`); negative rates count as zero
///
/// The returned values are unrounded.
pub fn compute_totals(
    lines: &[CartLine],
    discount_percent: Decimal,
    tax_rate: Decimal,
) -> CartTotals {
    let discount_percent = clamp_percent(discount_percent);
    let tax_rate = non_negative(tax_rate);

    let subtotal: Decimal = lines.iter().map(CartLine::line_total).sum();
    let discount_amount = subtotal * discount_percent / ONE_HUNDRED;
    let taxable_amount = subtotal - discount_amount;
    let tax_amount = taxable_amount * tax_rate;

    CartTotals {
        subtotal,
        discount_amount,
        taxable_amount,
        tax_amount,
        total: taxable_amount + tax_amount,
    }
}

/// Returns the change due when `amount_tendered` is handed over for `total`.
///
/// A negative result means the payment does not cover the total.
pub fn compute_change(
    total: Decimal,
    amount_tendered: Decimal,
) -> Decimal {
    amount_tendered - total
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn line(
        price: Decimal,
        quantity: u32,
    ) -> CartLine {
        CartLine::new(price, quantity).unwrap()
    }

    // =========================================================================
    // CartLine tests
    // =========================================================================

    #[test]
    fn cart_line_rejects_negative_price() {
        let result = CartLine::new(dec!(-1.00), 1);

        assert_eq!(result, Err(CartLineError::NegativeUnitPrice(dec!(-1.00))));
    }

    #[test]
    fn cart_line_rejects_zero_quantity() {
        let result = CartLine::new(dec!(10.00), 0);

        assert_eq!(result, Err(CartLineError::ZeroQuantity));
    }

    #[test]
    fn cart_line_allows_free_items() {
        let result = CartLine::new(dec!(0), 3).unwrap();

        assert_eq!(result.line_total(), dec!(0));
    }

    #[test]
    fn cart_line_total_multiplies_price_by_quantity() {
        assert_eq!(line(dec!(249.00), 3).line_total(), dec!(747.00));
    }

    #[test]
    fn with_quantity_keeps_price() {
        let updated = line(dec!(599.00), 1).with_quantity(NonZeroU32::new(4).unwrap());

        assert_eq!(updated.unit_price(), dec!(599.00));
        assert_eq!(updated.quantity(), 4);
    }

    // =========================================================================
    // compute_totals tests
    // =========================================================================

    #[test]
    fn empty_cart_has_zero_totals() {
        let totals = compute_totals(&[], dec!(0), dec!(0.08));

        assert_eq!(totals, CartTotals::default());
    }

    #[test]
    fn discount_applies_before_tax() {
        let totals = compute_totals(&[line(dec!(100), 2)], dec!(10), dec!(0.08));

        assert_eq!(totals.subtotal, dec!(200));
        assert_eq!(totals.discount_amount, dec!(20));
        assert_eq!(totals.taxable_amount, dec!(180));
        assert_eq!(totals.tax_amount, dec!(14.4));
        assert_eq!(totals.total, dec!(194.4));
    }

    #[test]
    fn subtotal_sums_every_line() {
        let lines = [line(dec!(899.00), 1), line(dec!(249.00), 1)];

        let totals = compute_totals(&lines, dec!(0), dec!(0.08)).rounded();

        assert_eq!(totals.subtotal, dec!(1148.00));
        assert_eq!(totals.tax_amount, dec!(91.84));
        assert_eq!(totals.total, dec!(1239.84));
    }

    #[test]
    fn discount_above_one_hundred_is_clamped() {
        let lines = [line(dec!(35.99), 3)];

        let over = compute_totals(&lines, dec!(150), dec!(0.08));
        let full = compute_totals(&lines, dec!(100), dec!(0.08));

        assert_eq!(over, full);
        assert_eq!(over.total, dec!(0));
    }

    #[test]
    fn negative_discount_is_clamped_to_zero() {
        let lines = [line(dec!(50), 1)];

        let negative = compute_totals(&lines, dec!(-20), dec!(0.08));
        let none = compute_totals(&lines, dec!(0), dec!(0.08));

        assert_eq!(negative, none);
    }

    #[test]
    fn negative_tax_rate_counts_as_zero() {
        let totals = compute_totals(&[line(dec!(50), 1)], dec!(0), dec!(-0.08));

        assert_eq!(totals.tax_amount, dec!(0));
        assert_eq!(totals.total, dec!(50));
    }

    #[test]
    fn totals_keep_full_precision_until_rounded() {
        // 3 × 0.333 = 0.999, 10% off = 0.8991, tax 8% = 0.071928
        let totals = compute_totals(&[line(dec!(0.333), 3)], dec!(10), dec!(0.08));

        assert_eq!(totals.taxable_amount, dec!(0.8991));
        assert_eq!(totals.tax_amount, dec!(0.071928));
        assert_eq!(totals.total, dec!(0.971028));
        assert_eq!(totals.rounded().total, dec!(0.97));
    }

    // =========================================================================
    // compute_change tests
    // =========================================================================

    #[test]
    fn change_is_tendered_minus_total() {
        assert_eq!(compute_change(dec!(194.4), dec!(200)), dec!(5.6));
    }

    #[test]
    fn change_is_negative_when_underpaid() {
        assert!(compute_change(dec!(194.4), dec!(100)) < Decimal::ZERO);
    }

    #[test]
    fn exact_payment_has_zero_change() {
        assert_eq!(compute_change(dec!(871.07), dec!(871.07)), dec!(0));
    }
}
