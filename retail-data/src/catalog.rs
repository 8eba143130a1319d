//! CSV loader for the product catalog.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column | Required | Type | Notes |
//! |-----------------|----------|---------|--------------------------------------|
//! | `sku` | yes | string | Uppercase letters, digits and `-` |
//! | `name` | yes | string | |
//! | `category` | no | string | |
//! | `supplier` | no | string | |
//! | `cost_price` | yes | decimal | |
//! | `selling_price` | yes | decimal | |
//! | `quantity` | yes | integer | Units on hand |
//! | `min_stock` | yes | integer | Reorder point |
//! | `description` | no | string | |
//!
//! ```csv
//! sku,name,category,supplier,cost_price,selling_price,quantity,min_stock,description
//! IPH15-128-BLK,iPhone 15 128GB Black,Smartphones,Apple Inc.,699.00,899.00,25,10,
//! ```
//!
//! Product ids are assigned from the row number.

use std::path::Path;

use retail_core::{Inventory, NewProduct, Product};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::csv_reader;
use crate::error::CsvLoadError;

#[derive(Debug, Deserialize)]
struct CsvRow {
    sku: String,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    supplier: String,
    cost_price: Decimal,
    selling_price: Decimal,
    quantity: u32,
    min_stock: u32,
    #[serde(default)]
    description: String,
}

impl From<CsvRow> for NewProduct {
    fn from(row: CsvRow) -> Self {
        NewProduct {
            sku: row.sku,
            name: row.name,
            category: row.category,
            supplier: row.supplier,
            cost_price: row.cost_price,
            selling_price: row.selling_price,
            quantity: row.quantity,
            min_stock: row.min_stock,
            description: row.description,
        }
    }
}

/// Parses a catalog and returns it as an [`Inventory`] with no movement
/// history.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is malformed or a value has the wrong type.
/// * [`CsvLoadError::Product`] if a row is not a valid product.
/// * [`CsvLoadError::Catalog`] if a SKU appears twice.
pub fn load_catalog_from_str(input: &str) -> Result<Inventory, CsvLoadError> {
    let mut reader = csv_reader(input);
    let mut inventory = Inventory::new();

    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = idx + 1;
        let id = u32::try_from(row).unwrap_or(u32::MAX);
        let product = Product::new(id, result?.into())
            .map_err(|source| CsvLoadError::Product { row, source })?;
        inventory
            .add_product(product)
            .map_err(|source| CsvLoadError::Catalog { row, source })?;
    }

    info!(products = inventory.products().len(), "catalog loaded");
    Ok(inventory)
}

/// Reads `path` and delegates to [`load_catalog_from_str`].
///
/// # Errors
///
/// Returns [`CsvLoadError::Io`] when the file cannot be read, or any error
/// of [`load_catalog_from_str`].
pub fn load_catalog_from_file(path: &Path) -> Result<Inventory, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_catalog_from_str(&contents)
}
