//! Purchase order line totaling and receiving.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use retail_core::calculations::{PurchaseOrderLine, compute_order_total, receive_lines};
//!
//! let mut lines = vec![
//!     PurchaseOrderLine::new("iPhone 15 128GB Black", 20, dec!(699.00)).unwrap(),
//!     PurchaseOrderLine::new("AirPods Pro 2nd Gen", 15, dec!(199.00)).unwrap(),
//! ];
//!
//! assert_eq!(compute_order_total(&lines), dec!(16965.00));
//!
//! receive_lines(&mut lines);
//! assert!(lines.iter().all(PurchaseOrderLine::is_fully_received));
//! ```

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Errors raised when building a [`PurchaseOrderLine`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurchaseOrderLineError {
    #[error("unit cost must be non-negative, got {0}")]
    NegativeUnitCost(Decimal),

    #[error("received quantity {received} exceeds ordered quantity {ordered}")]
    ReceivedExceedsOrdered { received: u32, ordered: u32 },
}

/// One product row on a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOrderLine {
    product: String,
    quantity_ordered: u32,
    quantity_received: u32,
    unit_cost: Decimal,
}

impl PurchaseOrderLine {
    /// Creates a line with nothing received yet.
    ///
    /// # Errors
    ///
    /// Returns [`PurchaseOrderLineError::NegativeUnitCost`] for a cost below zero.
    pub fn new(
        product: impl Into<String>,
        quantity_ordered: u32,
        unit_cost: Decimal,
    ) -> Result<Self, PurchaseOrderLineError> {
        if unit_cost < Decimal::ZERO {
            return Err(PurchaseOrderLineError::NegativeUnitCost(unit_cost));
        }
        Ok(Self {
            product: product.into(),
            quantity_ordered,
            quantity_received: 0,
            unit_cost,
        })
    }

    /// Creates a line that already records a received quantity, as when
    /// restoring an order that was partly or fully received elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`PurchaseOrderLineError::ReceivedExceedsOrdered`] when
    /// `quantity_received` is larger than `quantity_ordered`.
    pub fn with_received(
        product: impl Into<String>,
        quantity_ordered: u32,
        quantity_received: u32,
        unit_cost: Decimal,
    ) -> Result<Self, PurchaseOrderLineError> {
        if quantity_received > quantity_ordered {
            return Err(PurchaseOrderLineError::ReceivedExceedsOrdered {
                received: quantity_received,
                ordered: quantity_ordered,
            });
        }
        let mut line = Self::new(product, quantity_ordered, unit_cost)?;
        line.quantity_received = quantity_received;
        Ok(line)
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn quantity_ordered(&self) -> u32 {
        self.quantity_ordered
    }

    pub fn quantity_received(&self) -> u32 {
        self.quantity_received
    }

    pub fn unit_cost(&self) -> Decimal {
        self.unit_cost
    }

    /// Quantity ordered × unit cost.
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity_ordered) * self.unit_cost
    }

    /// Units still expected from the supplier.
    pub fn outstanding(&self) -> u32 {
        self.quantity_ordered - self.quantity_received
    }

    pub fn is_fully_received(&self) -> bool {
        self.quantity_received == self.quantity_ordered
    }

    /// Marks every ordered unit as received.
    fn receive_all(&mut self) {
        self.quantity_received = self.quantity_ordered;
    }
}

/// Sums the line totals of an order.
pub fn compute_order_total(lines: &[PurchaseOrderLine]) -> Decimal {
    lines.iter().map(PurchaseOrderLine::line_total).sum()
}

/// Sets every line's received quantity to its ordered quantity.
///
/// Partial receipt is not modeled. Calling this on already received lines
/// changes nothing.
pub fn receive_lines(lines: &mut [PurchaseOrderLine]) {
    for line in lines {
        line.receive_all();
    }
}
