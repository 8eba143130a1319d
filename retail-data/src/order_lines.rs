//! CSV loader for purchase order lines.
//!
//! ## CSV Format
//!
//! | Column | Required | Type | Notes |
//! |---------------------|----------|---------|-------------------------------------|
//! | `product` | yes | string | SKU or product name |
//! | `quantity_ordered` | yes | integer | |
//! | `unit_cost` | yes | decimal | Must be ≥ 0 |
//! | `quantity_received` | no | integer | Empty or absent means 0 received |
//!
//! ```csv
//! product,quantity_ordered,unit_cost
//! iPhone 15 Pro,20,699.00
//! AirPods Pro,15,199.00
//! ```

use std::path::Path;

use retail_core::calculations::PurchaseOrderLine;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::csv_reader;
use crate::error::CsvLoadError;

#[derive(Debug, Deserialize)]
struct CsvRow {
    product: String,
    quantity_ordered: u32,
    unit_cost: Decimal,
    quantity_received: Option<u32>,
}

/// Parses purchase order lines in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is malformed or a value has the wrong type.
/// * [`CsvLoadError::OrderLine`] if a cost is negative or more was received
///   than ordered.
pub fn load_order_lines_from_str(input: &str) -> Result<Vec<PurchaseOrderLine>, CsvLoadError> {
    let mut reader = csv_reader(input);

    let lines = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let record = result?;
            PurchaseOrderLine::with_received(
                record.product,
                record.quantity_ordered,
                record.quantity_received.unwrap_or(0),
                record.unit_cost,
            )
            .map_err(|source| CsvLoadError::OrderLine {
                row: idx + 1,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(lines = lines.len(), "purchase order lines loaded");
    Ok(lines)
}

/// Reads `path` and delegates to [`load_order_lines_from_str`].
///
/// # Errors
///
/// Returns [`CsvLoadError::Io`] when the file cannot be read, or any error
/// of [`load_order_lines_from_str`].
pub fn load_order_lines_from_file(path: &Path) -> Result<Vec<PurchaseOrderLine>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_order_lines_from_str(&contents)
}
