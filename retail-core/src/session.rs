//! Checkout session state for the point of sale.
//!
//! A [`CheckoutSession`] owns one customer's cart between the first scanned
//! item and payment. It holds no pricing logic of its own; totals always come
//! from [`compute_totals`]. Every mutating method validates before it
//! mutates, so a refused action leaves the session exactly as it was.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculations::common::clamp_percent;
use crate::calculations::{CartLine, CartLineError, CartTotals, compute_change, compute_totals};
use crate::input::parse_percent;
use crate::models::{PaymentMethod, Product, SaleItem, SaleStatus, SaleTransaction, StoreSettings};

/// Reasons a checkout is refused. Each is shown to the cashier as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Please select a payment method")]
    MissingPaymentMethod,

    #[error("Please enter the amount received")]
    MissingAmountTendered,

    #[error("Insufficient payment: total {total}, received {tendered}")]
    InsufficientPayment { total: Decimal, tendered: Decimal },
}

/// A product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItem {
    pub sku: String,
    pub name: String,
    line: CartLine,
}

impl CartItem {
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        line: CartLine,
    ) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            line,
        }
    }

    pub fn line(&self) -> CartLine {
        self.line
    }

    pub fn quantity(&self) -> u32 {
        self.line.quantity()
    }

    pub fn unit_price(&self) -> Decimal {
        self.line.unit_price()
    }

    pub fn line_total(&self) -> Decimal {
        self.line.line_total()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutSession {
    items: Vec<CartItem>,
    discount_percent: Decimal,
    payment_method: Option<PaymentMethod>,
    amount_tendered: Option<Decimal>,
    customer: Option<String>,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn discount_percent(&self) -> Decimal {
        self.discount_percent
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn amount_tendered(&self) -> Option<Decimal> {
        self.amount_tendered
    }

    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref()
    }

    /// Cart lines in scan order, ready for the calculator.
    pub fn lines(&self) -> Vec<CartLine> {
        self.items.iter().map(CartItem::line).collect()
    }

    /// Adds one unit of `product`, merging with an existing line for the
    /// same SKU.
    ///
    /// # Errors
    ///
    /// Returns [`CartLineError`] if the product's selling price is negative.
    pub fn add_product(
        &mut self,
        product: &Product,
    ) -> Result<(), CartLineError> {
        if let Some(item) = self.items.iter_mut().find(|i| i.sku == product.sku) {
            let next = NonZeroU32::MIN.saturating_add(item.quantity());
            item.line = item.line.with_quantity(next);
            debug!(sku = %item.sku, quantity = item.quantity(), "cart line incremented");
            return Ok(());
        }

        let line = CartLine::new(product.selling_price, 1)?;
        self.items.push(CartItem {
            sku: product.sku.clone(),
            name: product.name.clone(),
            line,
        });
        debug!(sku = %product.sku, "cart line added");
        Ok(())
    }

    /// Adds a priced item, e.g. one read from a saved cart.
    ///
    /// An item whose SKU is already in the cart adds its quantity to the
    /// existing line and keeps that line's price.
    pub fn add_item(
        &mut self,
        item: CartItem,
    ) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.sku == item.sku) {
            let next = NonZeroU32::MIN
                .saturating_add(item.quantity() - 1)
                .saturating_add(existing.quantity());
            existing.line = existing.line.with_quantity(next);
            debug!(sku = %existing.sku, quantity = existing.quantity(), "cart line merged");
            return;
        }
        debug!(sku = %item.sku, quantity = item.quantity(), "cart line added");
        self.items.push(item);
    }

    /// Sets the quantity of the line for `sku`.
    ///
    /// A quantity of zero or less removes the line. Returns `false` when no
    /// line has that SKU.
    pub fn update_quantity(
        &mut self,
        sku: &str,
        new_quantity: i64,
    ) -> bool {
        let clamped = new_quantity.min(i64::from(u32::MAX));
        let Some(quantity) = u32::try_from(clamped).ok().and_then(NonZeroU32::new) else {
            return self.remove(sku);
        };

        match self.items.iter_mut().find(|i| i.sku == sku) {
            Some(item) => {
                item.line = item.line.with_quantity(quantity);
                debug!(sku, quantity = quantity.get(), "cart line quantity set");
                true
            }
            None => false,
        }
    }

    /// Removes the line for `sku`. Returns `false` when there was none.
    pub fn remove(
        &mut self,
        sku: &str,
    ) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.sku != sku);
        let removed = self.items.len() != before;
        if removed {
            debug!(sku, "cart line removed");
        }
        removed
    }

    /// Empties the cart; discount, payment and customer are kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the session to its initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Sets the discount, clamped to `[0, 100]`.
    pub fn set_discount_percent(
        &mut self,
        percent: Decimal,
    ) {
        self.discount_percent = clamp_percent(percent);
    }

    /// Sets the discount from form text; non-numeric text counts as zero.
    pub fn set_discount_input(
        &mut self,
        input: &str,
    ) {
        self.discount_percent = parse_percent(input);
    }

    pub fn set_payment_method(
        &mut self,
        method: Option<PaymentMethod>,
    ) {
        self.payment_method = method;
    }

    pub fn set_amount_tendered(
        &mut self,
        amount: Option<Decimal>,
    ) {
        self.amount_tendered = amount;
    }

    pub fn set_customer(
        &mut self,
        customer: Option<String>,
    ) {
        self.customer = customer.filter(|c| !c.trim().is_empty());
    }

    /// Unrounded totals at `tax_rate`.
    pub fn totals(
        &self,
        tax_rate: Decimal,
    ) -> CartTotals {
        compute_totals(&self.lines(), self.discount_percent, tax_rate)
    }

    /// Change due on the rounded total, if an amount has been tendered.
    pub fn change_due(
        &self,
        tax_rate: Decimal,
    ) -> Option<Decimal> {
        let total = self.totals(tax_rate).rounded().total;
        self.amount_tendered
            .map(|tendered| compute_change(total, tendered))
    }

    /// Completes the sale.
    ///
    /// The tax rate comes from `settings`. Cash payments need an amount
    /// tendered; any tendered amount must cover the rounded total. On
    /// success the session is reset and the transaction is returned with id
    /// `TXN-<unix millis of now>`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] and leaves the session untouched when the
    /// cart is empty, no payment method is selected, cash was chosen without
    /// an amount, or the amount does not cover the total.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use rust_decimal_macros::dec;
    /// use retail_core::{CheckoutSession, NewProduct, PaymentMethod, Product, StoreSettings};
    ///
    /// let product = Product::new(1, NewProduct {
    ///     sku: "IPD-AIR-256-BLU".to_string(),
    ///     name: "iPad Air 256GB Blue".to_string(),
    ///     selling_price: dec!(599.00),
    ///     ..Default::default()
    /// }).unwrap();
    ///
    /// let mut session = CheckoutSession::new();
    /// session.add_product(&product).unwrap();
    /// session.set_payment_method(Some(PaymentMethod::Cash));
    /// session.set_amount_tendered(Some(dec!(700)));
    ///
    /// let sale = session.checkout(&StoreSettings::default(), "Alice Smith", Utc::now()).unwrap();
    ///
    /// assert_eq!(sale.totals.total, dec!(646.92));
    /// assert_eq!(sale.change_due, Some(dec!(53.08)));
    /// assert!(session.is_empty());
    /// ```
    pub fn checkout(
        &mut self,
        settings: &StoreSettings,
        cashier: &str,
        now: DateTime<Utc>,
    ) -> Result<SaleTransaction, CheckoutError> {
        if self.items.is_empty() {
            warn!("checkout refused: cart is empty");
            return Err(CheckoutError::EmptyCart);
        }
        let Some(payment_method) = self.payment_method else {
            warn!("checkout refused: no payment method");
            return Err(CheckoutError::MissingPaymentMethod);
        };
        if payment_method == PaymentMethod::Cash && self.amount_tendered.is_none() {
            warn!("checkout refused: cash payment without amount");
            return Err(CheckoutError::MissingAmountTendered);
        }

        let totals = self.totals(settings.tax_rate()).rounded();
        let change_due = self
            .amount_tendered
            .map(|tendered| (tendered, compute_change(totals.total, tendered)));
        if let Some((tendered, change)) = change_due {
            if change < Decimal::ZERO {
                warn!(total = %totals.total, %tendered, "checkout refused: insufficient payment");
                return Err(CheckoutError::InsufficientPayment {
                    total: totals.total,
                    tendered,
                });
            }
        }

        let sale = SaleTransaction {
            id: format!("TXN-{}", now.timestamp_millis()),
            at: now,
            customer: self.customer.clone(),
            cashier: cashier.to_string(),
            items: self
                .items
                .iter()
                .map(|item| SaleItem {
                    sku: item.sku.clone(),
                    name: item.name.clone(),
                    quantity: item.quantity(),
                    unit_price: item.unit_price(),
                })
                .collect(),
            discount_percent: self.discount_percent,
            totals,
            payment_method,
            amount_tendered: self.amount_tendered,
            change_due: change_due.map(|(_, change)| change),
            status: SaleStatus::Completed,
        };

        info!(id = %sale.id, total = %sale.totals.total, method = payment_method.as_str(), "sale completed");
        self.reset();
        Ok(sale)
    }
}
