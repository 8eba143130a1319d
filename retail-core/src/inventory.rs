//! The product catalog and its stock movement history.
//!
//! [`Inventory`] is the one place that changes on-hand quantities. Sales and
//! purchase-order receipts become [`StockMovement`]s, and a batch of
//! movements is applied all-or-nothing: if any movement in a batch fails the
//! catalog is left as it was.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{
    MovementKind, MovementSummary, Product, PurchaseOrder, SaleTransaction, StockMovement,
    StockMovementError, StockStatus,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("a product with SKU '{0}' already exists")]
    DuplicateSku(String),

    #[error("no product with SKU '{0}'")]
    UnknownSku(String),

    #[error(transparent)]
    Movement(#[from] StockMovementError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    products: Vec<Product>,
    movements: Vec<StockMovement>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from `products`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::DuplicateSku`] if two products share a SKU.
    pub fn from_products(products: Vec<Product>) -> Result<Self, InventoryError> {
        let mut inventory = Self::new();
        for product in products {
            inventory.add_product(product)?;
        }
        Ok(inventory)
    }

    /// Adds a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::DuplicateSku`] if the SKU is already listed.
    pub fn add_product(
        &mut self,
        product: Product,
    ) -> Result<(), InventoryError> {
        if self.get(&product.sku).is_some() {
            return Err(InventoryError::DuplicateSku(product.sku));
        }
        debug!(sku = %product.sku, "product added to catalog");
        self.products.push(product);
        Ok(())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Movement history, oldest first.
    pub fn movements(&self) -> &[StockMovement] {
        &self.movements
    }

    pub fn get(
        &self,
        sku: &str,
    ) -> Option<&Product> {
        self.products.iter().find(|p| p.sku == sku)
    }

    /// Finds a product by SKU, or failing that by case-insensitive name.
    ///
    /// Purchase order lines name products the way the supplier does, which
    /// is not always the SKU.
    pub fn find(
        &self,
        sku_or_name: &str,
    ) -> Option<&Product> {
        let key = sku_or_name.trim();
        self.get(key).or_else(|| {
            self.products
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(key))
        })
    }

    /// Applies one movement and records it in the history.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::UnknownSku`] when the SKU is not in the
    /// catalog and [`InventoryError::Movement`] when the movement itself is
    /// rejected. Nothing changes on error.
    pub fn apply_movement(
        &mut self,
        movement: StockMovement,
    ) -> Result<(), InventoryError> {
        self.apply_batch(vec![movement])
    }

    /// Books the stock of a sale out of the catalog, one `out` movement per
    /// sold item.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] if any item is unknown or short on stock;
    /// in that case no quantity changes.
    pub fn record_sale(
        &mut self,
        sale: &SaleTransaction,
    ) -> Result<(), InventoryError> {
        let movements = sale
            .items
            .iter()
            .map(|item| StockMovement {
                sku: item.sku.clone(),
                kind: MovementKind::Out,
                quantity: i64::from(item.quantity),
                reference: format!("Sale - {}", sale.id),
                user: sale.cashier.clone(),
                notes: String::new(),
                at: sale.at,
            })
            .collect();

        self.apply_batch(movements)?;
        info!(id = %sale.id, items = sale.items.len(), "sale booked out of stock");
        Ok(())
    }

    /// Receives `order` and books the received units into stock.
    ///
    /// Lines naming a product that is not in the catalog are skipped with a
    /// warning. When the order cannot be received (see
    /// [`PurchaseOrder::receive`]) nothing changes and `Ok(0)` is returned.
    /// Otherwise returns the number of movements recorded.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] if a movement is rejected; the order and
    /// the catalog are then both left unchanged.
    pub fn receive_purchase_order(
        &mut self,
        order: &mut PurchaseOrder,
        received_date: NaiveDate,
        user: &str,
        at: DateTime<Utc>,
    ) -> Result<usize, InventoryError> {
        let mut movements = Vec::new();
        for line in order.lines().iter().filter(|line| line.outstanding() > 0) {
            let Some(product) = self.find(line.product()) else {
                warn!(
                    po_number = %order.po_number,
                    product = line.product(),
                    "received product is not in the catalog"
                );
                continue;
            };
            movements.push(StockMovement {
                sku: product.sku.clone(),
                kind: MovementKind::In,
                quantity: i64::from(line.outstanding()),
                reference: format!("Purchase - {}", order.po_number),
                user: user.to_string(),
                notes: String::new(),
                at,
            });
        }

        let staged = self.stage(&movements)?;
        if !order.receive(received_date) {
            return Ok(0);
        }

        let count = movements.len();
        self.products = staged;
        self.movements.extend(movements);
        info!(po_number = %order.po_number, movements = count, "purchase order booked into stock");
        Ok(count)
    }

    /// Products at or below their reorder point, including those out of
    /// stock.
    pub fn low_stock(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.stock_status() != StockStatus::InStock)
            .collect()
    }

    /// Σ cost price × quantity on hand.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use retail_core::{Inventory, NewProduct, Product};
    ///
    /// let product = Product::new(1, NewProduct {
    ///     sku: "MBA-M2-256".to_string(),
    ///     name: "MacBook Air M2".to_string(),
    ///     cost_price: dec!(999.00),
    ///     selling_price: dec!(1199.00),
    ///     quantity: 3,
    ///     ..Default::default()
    /// }).unwrap();
    /// let inventory = Inventory::from_products(vec![product]).unwrap();
    ///
    /// assert_eq!(inventory.inventory_value(), dec!(2997.00));
    /// ```
    pub fn inventory_value(&self) -> Decimal {
        self.products.iter().map(Product::stock_value).sum()
    }

    pub fn movement_summary(&self) -> MovementSummary {
        MovementSummary::from_movements(&self.movements)
    }

    fn apply_batch(
        &mut self,
        movements: Vec<StockMovement>,
    ) -> Result<(), InventoryError> {
        self.products = self.stage(&movements)?;
        for movement in &movements {
            debug!(
                sku = %movement.sku,
                kind = movement.kind.as_str(),
                quantity = movement.quantity,
                "stock movement recorded"
            );
        }
        self.movements.extend(movements);
        Ok(())
    }

    /// Applies `movements` to a copy of the catalog.
    fn stage(
        &self,
        movements: &[StockMovement],
    ) -> Result<Vec<Product>, InventoryError> {
        let mut staged = self.products.clone();
        for movement in movements {
            let product = staged
                .iter_mut()
                .find(|p| p.sku == movement.sku)
                .ok_or_else(|| InventoryError::UnknownSku(movement.sku.clone()))?;
            movement.apply(product)?;
        }
        Ok(staged)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::{CartTotals, PurchaseOrderLine};
    use crate::models::{NewProduct, OrderStatus, PaymentMethod, SaleItem, SaleStatus};

    fn product(
        id: u32,
        sku: &str,
        name: &str,
        quantity: u32,
        min_stock: u32,
    ) -> Product {
        Product::new(
            id,
            NewProduct {
                sku: sku.to_string(),
                name: name.to_string(),
                cost_price: dec!(100),
                selling_price: dec!(150),
                quantity,
                min_stock,
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn catalog() -> Inventory {
        Inventory::from_products(vec![
            product(1, "IPH15-128-BLK", "iPhone 15 128GB Black", 25, 10),
            product(2, "APP-PRO-2ND", "AirPods Pro 2nd Gen", 8, 10),
            product(3, "WATCH-S9-45", "Apple Watch Series 9", 0, 5),
        ])
        .unwrap()
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
    }

    fn movement(
        sku: &str,
        kind: MovementKind,
        quantity: i64,
    ) -> StockMovement {
        StockMovement {
            sku: sku.to_string(),
            kind,
            quantity,
            reference: "Manual".to_string(),
            user: "Alice Smith".to_string(),
            notes: String::new(),
            at: at(),
        }
    }

    fn sale(items: Vec<SaleItem>) -> SaleTransaction {
        SaleTransaction {
            id: "TXN-001".to_string(),
            at: at(),
            customer: None,
            cashier: "Bob Johnson".to_string(),
            items,
            discount_percent: dec!(0),
            totals: CartTotals::default(),
            payment_method: PaymentMethod::Cash,
            amount_tendered: None,
            change_due: None,
            status: SaleStatus::Completed,
        }
    }

    fn sold(
        sku: &str,
        quantity: u32,
    ) -> SaleItem {
        SaleItem {
            sku: sku.to_string(),
            name: sku.to_string(),
            quantity,
            unit_price: dec!(150),
        }
    }

    fn ordered_po(lines: Vec<PurchaseOrderLine>) -> PurchaseOrder {
        PurchaseOrder::restore(
            2,
            "PO-2024-002",
            "Apple Inc.",
            NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
            OrderStatus::Ordered,
            lines,
        )
    }

    // =========================================================================
    // catalog
    // =========================================================================

    #[test]
    fn duplicate_sku_is_rejected() {
        let result = Inventory::from_products(vec![
            product(1, "IPH15-128-BLK", "iPhone", 1, 0),
            product(2, "IPH15-128-BLK", "iPhone again", 1, 0),
        ]);

        assert_eq!(
            result,
            Err(InventoryError::DuplicateSku("IPH15-128-BLK".to_string()))
        );
    }

    #[test]
    fn find_falls_back_to_name() {
        let inventory = catalog();

        assert_eq!(inventory.find("airpods pro 2nd gen").map(|p| p.id), Some(2));
        assert_eq!(inventory.find("WATCH-S9-45").map(|p| p.id), Some(3));
        assert_eq!(inventory.find("Galaxy S24"), None);
    }

    #[test]
    fn low_stock_includes_out_of_stock() {
        let inventory = catalog();

        let skus: Vec<&str> = inventory.low_stock().iter().map(|p| p.sku.as_str()).collect();

        assert_eq!(skus, vec!["APP-PRO-2ND", "WATCH-S9-45"]);
    }

    #[test]
    fn inventory_value_sums_cost_of_stock() {
        assert_eq!(catalog().inventory_value(), dec!(3300));
    }

    // =========================================================================
    // movements
    // =========================================================================

    #[test]
    fn adjustment_updates_quantity_and_history() {
        let mut inventory = catalog();

        inventory
            .apply_movement(movement("IPH15-128-BLK", MovementKind::Adjustment, -2))
            .unwrap();

        assert_eq!(inventory.get("IPH15-128-BLK").unwrap().quantity, 23);
        assert_eq!(inventory.movements().len(), 1);
        assert_eq!(inventory.movement_summary().adjustments, 1);
    }

    #[test]
    fn unknown_sku_movement_is_rejected() {
        let mut inventory = catalog();

        let result = inventory.apply_movement(movement("NOPE", MovementKind::In, 5));

        assert_eq!(result, Err(InventoryError::UnknownSku("NOPE".to_string())));
        assert!(inventory.movements().is_empty());
    }

    #[test]
    fn overselling_is_rejected_without_changes() {
        let mut inventory = catalog();
        let before = inventory.clone();

        let result = inventory.apply_movement(movement("APP-PRO-2ND", MovementKind::Out, 9));

        assert!(matches!(
            result,
            Err(InventoryError::Movement(StockMovementError::InsufficientStock { .. }))
        ));
        assert_eq!(inventory, before);
    }

    #[test]
    fn extreme_movements_are_errors_not_panics() {
        let mut inventory = catalog();
        let before = inventory.clone();

        let overflow =
            inventory.apply_movement(movement("IPH15-128-BLK", MovementKind::Adjustment, i64::MAX));
        let out_of_range =
            inventory.apply_movement(movement("IPH15-128-BLK", MovementKind::Out, i64::MIN));

        assert!(matches!(
            overflow,
            Err(InventoryError::Movement(StockMovementError::StockOverflow { .. }))
        ));
        assert_eq!(
            out_of_range,
            Err(InventoryError::Movement(StockMovementError::QuantityOutOfRange(i64::MIN)))
        );
        assert_eq!(inventory, before);
    }

    // =========================================================================
    // sales
    // =========================================================================

    #[test]
    fn record_sale_books_each_item_out() {
        let mut inventory = catalog();

        inventory
            .record_sale(&sale(vec![sold("IPH15-128-BLK", 1), sold("APP-PRO-2ND", 2)]))
            .unwrap();

        assert_eq!(inventory.get("IPH15-128-BLK").unwrap().quantity, 24);
        assert_eq!(inventory.get("APP-PRO-2ND").unwrap().quantity, 6);
        assert_eq!(inventory.movements()[0].reference, "Sale - TXN-001");
        assert_eq!(inventory.movement_summary().total_out, 3);
    }

    #[test]
    fn record_sale_is_all_or_nothing() {
        let mut inventory = catalog();
        let before = inventory.clone();

        let result = inventory.record_sale(&sale(vec![
            sold("IPH15-128-BLK", 1),
            sold("WATCH-S9-45", 1),
        ]));

        assert!(result.is_err());
        assert_eq!(inventory, before);
    }

    // =========================================================================
    // purchase order receipts
    // =========================================================================

    #[test]
    fn receiving_order_books_stock_in() {
        let mut inventory = catalog();
        let mut po = ordered_po(vec![
            PurchaseOrderLine::new("AirPods Pro 2nd Gen", 15, dec!(199)).unwrap(),
            PurchaseOrderLine::new("WATCH-S9-45", 10, dec!(299)).unwrap(),
            PurchaseOrderLine::new("Magic Keyboard", 5, dec!(79)).unwrap(),
        ]);

        let count = inventory
            .receive_purchase_order(&mut po, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(), "Alice Smith", at())
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(po.status(), OrderStatus::Received);
        assert_eq!(inventory.get("APP-PRO-2ND").unwrap().quantity, 23);
        assert_eq!(inventory.get("WATCH-S9-45").unwrap().quantity, 10);
        assert_eq!(inventory.movements()[0].reference, "Purchase - PO-2024-002");
        assert_eq!(inventory.movement_summary().total_in, 25);
    }

    #[test]
    fn receiving_pending_order_changes_nothing() {
        let mut inventory = catalog();
        let before = inventory.clone();
        let mut po = PurchaseOrder::restore(
            3,
            "PO-2024-003",
            "Apple Inc.",
            NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
            OrderStatus::Pending,
            vec![PurchaseOrderLine::new("APP-PRO-2ND", 5, dec!(199)).unwrap()],
        );

        let count = inventory
            .receive_purchase_order(&mut po, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(), "Alice Smith", at())
            .unwrap();

        assert_eq!(count, 0);
        assert_eq!(po.status(), OrderStatus::Pending);
        assert_eq!(inventory, before);
    }
}
