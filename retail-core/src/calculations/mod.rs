//! Pricing calculations for the point of sale and purchasing.
//!
//! Both calculators are pure functions over small in-memory collections.
//! Callers own the state and pass it in.

pub mod cart;
pub mod common;
pub mod purchase_order;

pub use cart::{CartLine, CartLineError, CartTotals, compute_change, compute_totals};
pub use purchase_order::{
    PurchaseOrderLine, PurchaseOrderLineError, compute_order_total, receive_lines,
};
