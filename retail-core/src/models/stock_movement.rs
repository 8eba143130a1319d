use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::product::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    /// Stock arriving, e.g. a received purchase order.
    In,
    /// Stock leaving, e.g. a sale.
    Out,
    /// Signed correction such as damage write-off or a recount.
    Adjustment,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Adjustment => "adjustment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            "adjustment" => Some(Self::Adjustment),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StockMovementError {
    #[error("movement quantity must be non-zero")]
    ZeroQuantity,

    #[error("movement for '{movement_sku}' applied to product '{product_sku}'")]
    SkuMismatch {
        movement_sku: String,
        product_sku: String,
    },

    #[error("movement quantity {0} is out of range")]
    QuantityOutOfRange(i64),

    #[error("insufficient stock for '{sku}': {on_hand} on hand, change of {change}")]
    InsufficientStock { sku: String, on_hand: u32, change: i64 },

    #[error("stock for '{sku}' would exceed {max}: {on_hand} on hand, change of {change}", max = u32::MAX)]
    StockOverflow { sku: String, on_hand: u32, change: i64 },
}

/// A recorded change to a product's on-hand quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub sku: String,
    pub kind: MovementKind,
    /// For `In` and `Out` only the magnitude is used; `Adjustment` is signed.
    pub quantity: i64,
    /// Source document, e.g. `Sale - TXN-001` or `Purchase - PO-2024-002`.
    pub reference: String,
    pub user: String,
    pub notes: String,
    pub at: DateTime<Utc>,
}

impl StockMovement {
    /// Signed change this movement makes to on-hand stock, or `None` when
    /// the magnitude of an `In` or `Out` quantity does not fit an `i64`.
    pub fn delta(&self) -> Option<i64> {
        match self.kind {
            MovementKind::In => self.quantity.checked_abs(),
            MovementKind::Out => self.quantity.checked_abs().map(|q| -q),
            MovementKind::Adjustment => Some(self.quantity),
        }
    }

    /// Applies the movement to `product`.
    ///
    /// The product is left unchanged when an error is returned.
    ///
    /// # Errors
    ///
    /// * [`StockMovementError::ZeroQuantity`] for a zero quantity.
    /// * [`StockMovementError::SkuMismatch`] when the SKUs differ.
    /// * [`StockMovementError::QuantityOutOfRange`] for an `In` or `Out` of `i64::MIN`.
    /// * [`StockMovementError::InsufficientStock`] when stock would drop below zero.
    /// * [`StockMovementError::StockOverflow`] when stock would exceed `u32::MAX`.
    pub fn apply(
        &self,
        product: &mut Product,
    ) -> Result<(), StockMovementError> {
        if self.quantity == 0 {
            return Err(StockMovementError::ZeroQuantity);
        }
        if self.sku != product.sku {
            return Err(StockMovementError::SkuMismatch {
                movement_sku: self.sku.clone(),
                product_sku: product.sku.clone(),
            });
        }

        let change = self
            .delta()
            .ok_or(StockMovementError::QuantityOutOfRange(self.quantity))?;
        let overflow = || StockMovementError::StockOverflow {
            sku: product.sku.clone(),
            on_hand: product.quantity,
            change,
        };
        let updated = i64::from(product.quantity)
            .checked_add(change)
            .ok_or_else(overflow)?;
        if updated < 0 {
            return Err(StockMovementError::InsufficientStock {
                sku: product.sku.clone(),
                on_hand: product.quantity,
                change,
            });
        }

        let updated = u32::try_from(updated).map_err(|_| overflow())?;

        product.quantity = updated;
        Ok(())
    }
}

/// Totals shown above the movement history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MovementSummary {
    pub total_in: u64,
    pub total_out: u64,
    pub adjustments: usize,
}

impl MovementSummary {
    pub fn from_movements(movements: &[StockMovement]) -> Self {
        movements
            .iter()
            .fold(Self::default(), |mut summary, movement| {
                let magnitude = movement.quantity.unsigned_abs();
                match movement.kind {
                    MovementKind::In => {
                        summary.total_in = summary.total_in.saturating_add(magnitude);
                    }
                    MovementKind::Out => {
                        summary.total_out = summary.total_out.saturating_add(magnitude);
                    }
                    MovementKind::Adjustment => summary.adjustments += 1,
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::NewProduct;

    fn product(quantity: u32) -> Product {
        Product::new(
            3,
            NewProduct {
                sku: "MBA-M3-512-SLV".to_string(),
                name: "MacBook Air M3 512GB Silver".to_string(),
                cost_price: dec!(1299.00),
                selling_price: dec!(1599.00),
                quantity,
                min_stock: 8,
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn movement(
        kind: MovementKind,
        quantity: i64,
    ) -> StockMovement {
        StockMovement {
            sku: "MBA-M3-512-SLV".to_string(),
            kind,
            quantity,
            reference: "Stock Adjustment".to_string(),
            user: "Store Manager".to_string(),
            notes: String::new(),
            at: Utc.with_ymd_and_hms(2024, 1, 14, 16, 45, 0).unwrap(),
        }
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [MovementKind::In, MovementKind::Out, MovementKind::Adjustment] {
            assert_eq!(MovementKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MovementKind::parse("transfer"), None);
    }

    #[test]
    fn in_movement_adds_magnitude() {
        let mut product = product(12);

        movement(MovementKind::In, -5).apply(&mut product).unwrap();

        assert_eq!(product.quantity, 17);
    }

    #[test]
    fn out_movement_subtracts_magnitude() {
        let mut product = product(12);

        movement(MovementKind::Out, 3).apply(&mut product).unwrap();

        assert_eq!(product.quantity, 9);
    }

    #[test]
    fn adjustment_is_signed() {
        let mut product = product(12);

        movement(MovementKind::Adjustment, -2).apply(&mut product).unwrap();

        assert_eq!(product.quantity, 10);
    }

    #[test]
    fn movement_below_zero_is_rejected_and_leaves_stock() {
        let mut product = product(2);

        let result = movement(MovementKind::Out, 3).apply(&mut product);

        assert_eq!(
            result,
            Err(StockMovementError::InsufficientStock {
                sku: "MBA-M3-512-SLV".to_string(),
                on_hand: 2,
                change: -3
            })
        );
        assert_eq!(product.quantity, 2);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut product = product(2);

        let result = movement(MovementKind::Adjustment, 0).apply(&mut product);

        assert_eq!(result, Err(StockMovementError::ZeroQuantity));
    }

    #[test]
    fn mismatched_sku_is_rejected() {
        let mut product = product(2);
        let mut other = movement(MovementKind::In, 1);
        other.sku = "IPH15-128-BLK".to_string();

        let result = other.apply(&mut product);

        assert!(matches!(result, Err(StockMovementError::SkuMismatch { .. })));
    }

    // =========================================================================
    // extreme quantities
    // =========================================================================

    #[test]
    fn adjustment_past_u32_max_is_an_overflow() {
        let mut product = product(12);

        let result = movement(MovementKind::Adjustment, i64::MAX).apply(&mut product);

        assert_eq!(
            result,
            Err(StockMovementError::StockOverflow {
                sku: "MBA-M3-512-SLV".to_string(),
                on_hand: 12,
                change: i64::MAX
            })
        );
        assert_eq!(product.quantity, 12);
    }

    #[test]
    fn receipt_above_u32_max_is_an_overflow_not_a_shortage() {
        let mut product = product(u32::MAX - 1);

        let result = movement(MovementKind::In, 2).apply(&mut product);

        assert!(matches!(result, Err(StockMovementError::StockOverflow { change: 2, .. })));
        assert_eq!(product.quantity, u32::MAX - 1);
    }

    #[test]
    fn out_of_i64_min_is_out_of_range() {
        let mut product = product(12);
        let extreme = movement(MovementKind::Out, i64::MIN);

        assert_eq!(extreme.delta(), None);
        assert_eq!(
            extreme.apply(&mut product),
            Err(StockMovementError::QuantityOutOfRange(i64::MIN))
        );
        assert_eq!(product.quantity, 12);
    }

    #[test]
    fn summary_saturates_on_extreme_quantities() {
        let movements = vec![
            movement(MovementKind::Out, i64::MIN),
            movement(MovementKind::Out, i64::MIN),
            movement(MovementKind::In, i64::MAX),
        ];

        let summary = MovementSummary::from_movements(&movements);

        assert_eq!(summary.total_out, u64::MAX);
        assert_eq!(summary.total_in, i64::MAX as u64);
    }

    // =========================================================================
    // summary
    // =========================================================================

    #[test]
    fn summary_counts_each_kind() {
        let movements = vec![
            movement(MovementKind::Out, 1),
            movement(MovementKind::In, 20),
            movement(MovementKind::Adjustment, -2),
            movement(MovementKind::Out, 3),
            movement(MovementKind::In, 15),
        ];

        let summary = MovementSummary::from_movements(&movements);

        assert_eq!(
            summary,
            MovementSummary {
                total_in: 35,
                total_out: 4,
                adjustments: 1
            }
        );
    }
}
