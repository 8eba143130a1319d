//! CSV loader for saved carts.
//!
//! ## CSV Format
//!
//! | Column | Required | Type | Notes |
//! |--------------|----------|---------|------------------|
//! | `sku` | yes | string | |
//! | `name` | no | string | Shown on quotes |
//! | `unit_price` | yes | decimal | Must be ≥ 0 |
//! | `quantity` | yes | integer | Must be ≥ 1 |
//!
//! ```csv
//! sku,name,unit_price,quantity
//! IPH15-128-BLK,iPhone 15 128GB Black,899.00,1
//! APP-PRO-2ND,AirPods Pro 2nd Gen,249.00,2
//! ```

use std::path::Path;

use retail_core::calculations::CartLine;
use retail_core::{CartItem, CheckoutSession};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::csv_reader;
use crate::error::CsvLoadError;

#[derive(Debug, Deserialize)]
struct CsvRow {
    sku: String,
    #[serde(default)]
    name: String,
    unit_price: Decimal,
    quantity: u32,
}

/// Parses a saved cart into a fresh [`CheckoutSession`].
///
/// Rows sharing a SKU are merged into one line at the first row's price.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is malformed or a value has the wrong type.
/// * [`CsvLoadError::CartLine`] if a price is negative or a quantity is zero.
pub fn load_cart_from_str(input: &str) -> Result<CheckoutSession, CsvLoadError> {
    let mut reader = csv_reader(input);
    let mut session = CheckoutSession::new();

    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = idx + 1;
        let record = result?;
        let line = CartLine::new(record.unit_price, record.quantity)
            .map_err(|source| CsvLoadError::CartLine { row, source })?;
        session.add_item(CartItem::new(record.sku, record.name, line));
    }

    info!(lines = session.items().len(), "cart loaded");
    Ok(session)
}

/// Reads `path` and delegates to [`load_cart_from_str`].
///
/// # Errors
///
/// Returns [`CsvLoadError::Io`] when the file cannot be read, or any error
/// of [`load_cart_from_str`].
pub fn load_cart_from_file(path: &Path) -> Result<CheckoutSession, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_cart_from_str(&contents)
}
