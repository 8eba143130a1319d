//! TOML loader for store settings.
//!
//! Every key is optional; missing keys take the values of
//! [`StoreSettings::default`].
//!
//! ```toml
//! name = "Downtown Electronics"
//! tax_rate_percent = 7.25
//! currency = "USD"
//!
//! [logging]
//! level = "debug"
//! file = "retail-pos.log"
//! ```

use std::path::Path;

use retail_core::StoreSettings;
use tracing::{debug, info};

use crate::error::SettingsError;

/// Parses and validates store settings.
///
/// # Errors
///
/// Returns [`SettingsError::Parse`] for malformed TOML or a value of the
/// wrong type, and [`SettingsError::Invalid`] when validation fails.
pub fn load_settings_from_str(input: &str) -> Result<StoreSettings, SettingsError> {
    let settings: StoreSettings = toml::from_str(input)?;
    settings.validate()?;
    Ok(settings)
}

/// Reads `path` and delegates to [`load_settings_from_str`].
///
/// # Errors
///
/// Returns [`SettingsError::Io`] when the file cannot be read, or any error
/// of [`load_settings_from_str`].
pub fn load_settings_from_file(path: &Path) -> Result<StoreSettings, SettingsError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = load_settings_from_str(&contents)?;
    info!(path = %path.display(), store = %settings.name, "store settings loaded");
    Ok(settings)
}

/// Loads settings from `path`, or returns the defaults when there is none.
///
/// # Errors
///
/// Same as [`load_settings_from_file`].
pub fn load_settings(path: Option<&Path>) -> Result<StoreSettings, SettingsError> {
    match path {
        Some(path) => load_settings_from_file(path),
        None => {
            debug!("no settings file given; using defaults");
            Ok(StoreSettings::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use retail_core::StoreSettingsError;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = load_settings_from_str("").expect("empty settings are valid");

        assert_eq!(settings, StoreSettings::default());
    }

    #[test]
    fn parses_store_and_logging_tables() {
        let toml = r#"
name = "Downtown Electronics"
tax_rate_percent = 7.25
currency = "EUR"

[logging]
level = "debug"
"#;

        let settings = load_settings_from_str(toml).expect("should parse");

        assert_eq!(settings.name, "Downtown Electronics");
        assert_eq!(settings.tax_rate(), dec!(0.0725));
        assert_eq!(settings.currency_symbol(), "€");
        assert_eq!(settings.logging.level.as_deref(), Some("debug"));
        assert_eq!(settings.logging.file, None);
        assert_eq!(settings.receipt_footer, "Thank you for shopping with us!");
    }

    #[test]
    fn integer_tax_rate_is_accepted() {
        let settings = load_settings_from_str("tax_rate_percent = 5").expect("should parse");

        assert_eq!(settings.tax_rate(), dec!(0.05));
    }

    #[test]
    fn out_of_range_tax_rate_is_invalid() {
        let result = load_settings_from_str("tax_rate_percent = 150");

        match result.unwrap_err() {
            SettingsError::Invalid(err) => {
                assert_eq!(err, StoreSettingsError::InvalidTaxRate(dec!(150)));
            }
            other => panic!("expected Invalid error, got {:?}", other),
        }
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let result = load_settings_from_str("name = 42");

        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn no_path_gives_defaults() {
        assert_eq!(load_settings(None).expect("defaults"), StoreSettings::default());
    }
}
