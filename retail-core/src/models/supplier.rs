use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::purchase_order::{OrderStatus, PurchaseOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierStatus {
    Active,
    Inactive,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SupplierError {
    #[error("supplier name is required")]
    MissingName,

    #[error("contact email is required")]
    MissingEmail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: u32,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: SupplierStatus,
}

impl Supplier {
    /// Creates an active supplier.
    ///
    /// # Errors
    ///
    /// Returns [`SupplierError`] when the name or email is blank.
    pub fn new(
        id: u32,
        name: &str,
        contact_person: &str,
        email: &str,
    ) -> Result<Self, SupplierError> {
        if name.trim().is_empty() {
            return Err(SupplierError::MissingName);
        }
        if email.trim().is_empty() {
            return Err(SupplierError::MissingEmail);
        }
        Ok(Self {
            id,
            name: name.trim().to_string(),
            contact_person: contact_person.trim().to_string(),
            email: email.trim().to_string(),
            phone: String::new(),
            address: String::new(),
            status: SupplierStatus::Active,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == SupplierStatus::Active
    }
}

/// Order count and spend for one supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SupplierSpend {
    pub orders: usize,
    pub total_amount: Decimal,
}

impl SupplierSpend {
    /// Average order value; zero when there are no orders.
    pub fn average_order(&self) -> Decimal {
        if self.orders == 0 {
            Decimal::ZERO
        } else {
            self.total_amount / Decimal::from(self.orders)
        }
    }
}

/// Sums the purchase orders placed with `supplier`, skipping cancelled ones.
pub fn supplier_spend(
    orders: &[PurchaseOrder],
    supplier: &str,
) -> SupplierSpend {
    orders
        .iter()
        .filter(|po| po.supplier == supplier && po.status() != OrderStatus::Cancelled)
        .fold(SupplierSpend::default(), |mut spend, po| {
            spend.orders += 1;
            spend.total_amount += po.total_amount();
            spend
        })
}
