//! Purchase orders and their lifecycle.
//!
//! ```text
//! pending ──► ordered ──► received
//!    │           │
//!    └─────┬─────┘
//!          ▼
//!      cancelled
//! ```
//!
//! `received` and `cancelled` are terminal.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::{
    PurchaseOrderLine, PurchaseOrderLineError, compute_order_total, receive_lines,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Ordered,
    Received,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ordered => "ordered",
            Self::Received => "received",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "ordered" => Some(Self::Ordered),
            "received" => Some(Self::Received),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Received | Self::Cancelled)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(
        &self,
        next: OrderStatus,
    ) -> bool {
        matches!(
            (*self, next),
            (Self::Pending, Self::Ordered)
                | (Self::Ordered, Self::Received)
                | (Self::Pending | Self::Ordered, Self::Cancelled)
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("purchase order {po_number} cannot move from {} to {}", .from.as_str(), .to.as_str())]
pub struct OrderTransitionError {
    pub po_number: String,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Errors raised while turning a draft into a purchase order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurchaseOrderError {
    #[error("supplier is required")]
    MissingSupplier,

    #[error("a purchase order needs at least one item")]
    NoItems,

    #[error("item {0} has no product")]
    MissingProduct(usize),

    #[error("item {0} has no quantity")]
    MissingQuantity(usize),

    #[error("item {index}: {source}")]
    InvalidLine {
        index: usize,
        #[source]
        source: PurchaseOrderLineError,
    },
}

/// One row of the "create purchase order" form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DraftItem {
    pub product: String,
    pub quantity: u32,
    pub unit_cost: Decimal,
}

/// Unsubmitted purchase order, as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PurchaseOrderDraft {
    pub supplier: String,
    pub expected_date: Option<NaiveDate>,
    pub notes: String,
    pub items: Vec<DraftItem>,
}

impl PurchaseOrderDraft {
    /// Validates the draft and creates a `pending` purchase order.
    ///
    /// The PO number is `PO-<order year>-<id, zero padded to 3>`. Item
    /// indexes in errors are 1-based.
    ///
    /// # Errors
    ///
    /// Returns [`PurchaseOrderError`] when the supplier is blank, there are no
    /// items, or an item has no product, no quantity, or a negative cost.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use rust_decimal_macros::dec;
    /// use retail_core::{DraftItem, OrderStatus, PurchaseOrderDraft};
    ///
    /// let draft = PurchaseOrderDraft {
    ///     supplier: "Apple Inc.".to_string(),
    ///     items: vec![DraftItem {
    ///         product: "iPad Air 256GB".to_string(),
    ///         quantity: 10,
    ///         unit_cost: dec!(499.00),
    ///     }],
    ///     ..Default::default()
    /// };
    ///
    /// let order_date = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
    /// let po = draft.submit(4, order_date).unwrap();
    ///
    /// assert_eq!(po.po_number, "PO-2024-004");
    /// assert_eq!(po.status(), OrderStatus::Pending);
    /// assert_eq!(po.total_amount(), dec!(4990.00));
    /// ```
    pub fn submit(
        self,
        id: u32,
        order_date: NaiveDate,
    ) -> Result<PurchaseOrder, PurchaseOrderError> {
        let supplier = self.supplier.trim().to_string();
        if supplier.is_empty() {
            return Err(PurchaseOrderError::MissingSupplier);
        }
        if self.items.is_empty() {
            return Err(PurchaseOrderError::NoItems);
        }

        let lines = self
            .items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                let index = idx + 1;
                if item.product.trim().is_empty() {
                    return Err(PurchaseOrderError::MissingProduct(index));
                }
                if item.quantity == 0 {
                    return Err(PurchaseOrderError::MissingQuantity(index));
                }
                PurchaseOrderLine::new(item.product.trim(), item.quantity, item.unit_cost)
                    .map_err(|source| PurchaseOrderError::InvalidLine { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let po = PurchaseOrder {
            id,
            po_number: format!("PO-{}-{:03}", order_date.year(), id),
            supplier,
            order_date,
            expected_date: self.expected_date,
            received_date: None,
            notes: self.notes,
            status: OrderStatus::Pending,
            lines,
        };
        debug!(po_number = %po.po_number, lines = po.lines.len(), "purchase order created");
        Ok(po)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOrder {
    pub id: u32,
    pub po_number: String,
    pub supplier: String,
    pub order_date: NaiveDate,
    pub expected_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,
    pub notes: String,
    status: OrderStatus,
    lines: Vec<PurchaseOrderLine>,
}

impl PurchaseOrder {
    /// Rebuilds an order in any status, e.g. from saved sample data.
    ///
    /// When `status` is `received` every line is marked fully received.
    pub fn restore(
        id: u32,
        po_number: impl Into<String>,
        supplier: impl Into<String>,
        order_date: NaiveDate,
        status: OrderStatus,
        mut lines: Vec<PurchaseOrderLine>,
    ) -> Self {
        if status == OrderStatus::Received {
            receive_lines(&mut lines);
        }
        Self {
            id,
            po_number: po_number.into(),
            supplier: supplier.into(),
            order_date,
            expected_date: None,
            received_date: None,
            notes: String::new(),
            status,
            lines,
        }
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn lines(&self) -> &[PurchaseOrderLine] {
        &self.lines
    }

    /// Σ quantity ordered × unit cost. Always derived from the lines.
    pub fn total_amount(&self) -> Decimal {
        compute_order_total(&self.lines)
    }

    /// Moves the order to `next` when the lifecycle allows it.
    ///
    /// Moving to `received` goes through [`PurchaseOrder::receive`] semantics
    /// (every line is filled) but leaves `received_date` unset; prefer
    /// `receive` when the receiving date is known.
    ///
    /// # Errors
    ///
    /// Returns [`OrderTransitionError`] for a transition the lifecycle forbids,
    /// including any transition out of `received` or `cancelled`.
    pub fn transition_to(
        &mut self,
        next: OrderStatus,
    ) -> Result<(), OrderTransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(OrderTransitionError {
                po_number: self.po_number.clone(),
                from: self.status,
                to: next,
            });
        }
        if next == OrderStatus::Received {
            receive_lines(&mut self.lines);
        }
        debug!(po_number = %self.po_number, from = self.status.as_str(), to = next.as_str(), "order status changed");
        self.status = next;
        Ok(())
    }

    /// Sends a pending order to the supplier.
    ///
    /// # Errors
    ///
    /// Returns [`OrderTransitionError`] unless the order is `pending`.
    pub fn place(&mut self) -> Result<(), OrderTransitionError> {
        self.transition_to(OrderStatus::Ordered)
    }

    /// Cancels a pending or ordered order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderTransitionError`] when the order is already received
    /// or cancelled.
    pub fn cancel(&mut self) -> Result<(), OrderTransitionError> {
        self.transition_to(OrderStatus::Cancelled)
    }

    /// Receives every line in full and marks the order `received`.
    ///
    /// Only an `ordered` order can be received. In any other status the call
    /// is refused silently: nothing changes and `false` is returned. Receiving
    /// an already received order is therefore a no-op.
    pub fn receive(
        &mut self,
        received_date: NaiveDate,
    ) -> bool {
        if self.status != OrderStatus::Ordered {
            warn!(
                po_number = %self.po_number,
                status = self.status.as_str(),
                "receive refused; order is not in ordered status"
            );
            return false;
        }
        receive_lines(&mut self.lines);
        self.status = OrderStatus::Received;
        self.received_date = Some(received_date);
        debug!(po_number = %self.po_number, %received_date, "purchase order received");
        true
    }
}
