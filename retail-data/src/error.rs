use std::path::PathBuf;

use retail_core::calculations::{CartLineError, PurchaseOrderLineError};
use retail_core::{InventoryError, ProductError, StoreSettingsError};
use thiserror::Error;

/// Errors that can occur while loading a CSV file.
///
/// Row numbers are 1-based and count data rows only (the header is row 0).
#[derive(Debug, Error)]
pub enum CsvLoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure, missing required column, type mismatch, etc.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("invalid product on row {row}: {source}")]
    Product {
        row: usize,
        #[source]
        source: ProductError,
    },

    #[error("cannot add product on row {row}: {source}")]
    Catalog {
        row: usize,
        #[source]
        source: InventoryError,
    },

    #[error("invalid cart line on row {row}: {source}")]
    CartLine {
        row: usize,
        #[source]
        source: CartLineError,
    },

    #[error("invalid purchase order line on row {row}: {source}")]
    OrderLine {
        row: usize,
        #[source]
        source: PurchaseOrderLineError,
    },
}

/// Errors that can occur while loading store settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(#[from] StoreSettingsError),
}
