use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper-case letters, digits and single hyphens, e.g. `IPH15-128-BLK`.
static SKU_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9]+(-[A-Z0-9]+)*$").expect("SKU pattern is a valid regex")
});

/// Returns `true` if `sku` is a well-formed stock-keeping unit.
pub fn is_valid_sku(sku: &str) -> bool {
    SKU_PATTERN.is_match(sku)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("product name is required")]
    MissingName,

    #[error("SKU is required")]
    MissingSku,

    #[error("SKU '{0}' must contain only A-Z, 0-9 and single hyphens")]
    InvalidSku(String),

    #[error("{field} must be non-negative, got {value}")]
    NegativePrice { field: &'static str, value: Decimal },
}

/// Stock level classification shown beside each catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub supplier: String,
    pub cost_price: Decimal,
    pub selling_price: Decimal,
    /// Units on hand.
    pub quantity: u32,
    /// Reorder point; at or below this the product is low on stock.
    pub min_stock: u32,
    pub description: String,
}

/// For creating new catalog entries (no id)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub supplier: String,
    pub cost_price: Decimal,
    pub selling_price: Decimal,
    pub quantity: u32,
    pub min_stock: u32,
    pub description: String,
}

impl Product {
    /// Validates `new` and assigns it `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError`] when the name or SKU is missing, the SKU is
    /// malformed, or either price is negative.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use retail_core::{NewProduct, Product, StockStatus};
    ///
    /// let product = Product::new(1, NewProduct {
    ///     sku: "APP-PRO-2ND".to_string(),
    ///     name: "AirPods Pro 2nd Generation".to_string(),
    ///     cost_price: dec!(199.00),
    ///     selling_price: dec!(249.00),
    ///     quantity: 30,
    ///     min_stock: 10,
    ///     ..Default::default()
    /// }).unwrap();
    ///
    /// assert_eq!(product.margin(), dec!(50.00));
    /// assert_eq!(product.stock_status(), StockStatus::InStock);
    /// ```
    pub fn new(
        id: u32,
        new: NewProduct,
    ) -> Result<Self, ProductError> {
        let sku = new.sku.trim().to_string();
        let name = new.name.trim().to_string();

        if name.is_empty() {
            return Err(ProductError::MissingName);
        }
        if sku.is_empty() {
            return Err(ProductError::MissingSku);
        }
        if !is_valid_sku(&sku) {
            return Err(ProductError::InvalidSku(sku));
        }
        if new.cost_price < Decimal::ZERO {
            return Err(ProductError::NegativePrice {
                field: "cost price",
                value: new.cost_price,
            });
        }
        if new.selling_price < Decimal::ZERO {
            return Err(ProductError::NegativePrice {
                field: "selling price",
                value: new.selling_price,
            });
        }

        Ok(Self {
            id,
            sku,
            name,
            category: new.category,
            supplier: new.supplier,
            cost_price: new.cost_price,
            selling_price: new.selling_price,
            quantity: new.quantity,
            min_stock: new.min_stock,
            description: new.description,
        })
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.quantity == 0 {
            StockStatus::OutOfStock
        } else if self.quantity <= self.min_stock {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Selling price less cost price, per unit.
    pub fn margin(&self) -> Decimal {
        self.selling_price - self.cost_price
    }

    /// Cost value of the units on hand.
    pub fn stock_value(&self) -> Decimal {
        self.cost_price * Decimal::from(self.quantity)
    }
}
