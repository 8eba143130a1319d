//! File loaders for the retail workspace.
//!
//! Catalogs, saved carts and purchase order lines are CSV; store settings are
//! TOML. Every loader has a `*_from_str` form that does the parsing and a
//! `*_from_file` wrapper that reads the file first.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod order_lines;
pub mod settings;

pub use cart::{load_cart_from_file, load_cart_from_str};
pub use catalog::{load_catalog_from_file, load_catalog_from_str};
pub use error::{CsvLoadError, SettingsError};
pub use order_lines::{load_order_lines_from_file, load_order_lines_from_str};
pub use settings::{load_settings, load_settings_from_file, load_settings_from_str};

/// Opens a strict CSV reader: headers required, values trimmed, every row
/// the same width as the header.
pub(crate) fn csv_reader(input: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes())
}
