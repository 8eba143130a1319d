use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::ONE_HUNDRED;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreSettingsError {
    #[error("store name is required")]
    MissingName,

    #[error("tax rate must be between 0 and 100 percent, got {0}")]
    InvalidTaxRate(Decimal),

    #[error("currency code is required")]
    MissingCurrency,
}

/// Optional `[logging]` table of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive such as `info` or `retail_core=debug`.
    pub level: Option<String>,
    /// File that log records are appended to.
    pub file: Option<String>,
}

/// Store-wide configuration.
///
/// This is the single source of truth for the sales tax rate used at
/// checkout. Missing keys in a settings file fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    /// Sales tax as a percentage, e.g. `8.00`.
    pub tax_rate_percent: Decimal,
    /// ISO 4217 code, e.g. `USD`.
    pub currency: String,
    pub timezone: String,
    pub receipt_footer: String,
    pub logging: LoggingSettings,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            name: "Retail Store".to_string(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            website: String::new(),
            tax_rate_percent: Decimal::new(800, 2),
            currency: "USD".to_string(),
            timezone: "America/New_York".to_string(),
            receipt_footer: "Thank you for shopping with us!".to_string(),
            logging: LoggingSettings::default(),
        }
    }
}

impl StoreSettings {
    /// Tax rate as a fraction for the cart calculator.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use retail_core::StoreSettings;
    ///
    /// assert_eq!(StoreSettings::default().tax_rate(), dec!(0.08));
    /// ```
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate_percent / ONE_HUNDRED
    }

    /// Symbol used when printing amounts; falls back to the ISO code.
    pub fn currency_symbol(&self) -> &str {
        match self.currency.as_str() {
            "USD" | "CAD" | "AUD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" => "¥",
            other => other,
        }
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`StoreSettingsError`] if:
    /// - `name` is blank
    /// - `tax_rate_percent` is not in [0, 100]
    /// - `currency` is blank
    pub fn validate(&self) -> Result<(), StoreSettingsError> {
        if self.name.trim().is_empty() {
            return Err(StoreSettingsError::MissingName);
        }
        if self.tax_rate_percent < Decimal::ZERO || self.tax_rate_percent > ONE_HUNDRED {
            return Err(StoreSettingsError::InvalidTaxRate(self.tax_rate_percent));
        }
        if self.currency.trim().is_empty() {
            return Err(StoreSettingsError::MissingCurrency);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_settings_are_valid() {
        assert_eq!(StoreSettings::default().validate(), Ok(()));
    }

    #[test]
    fn tax_rate_converts_percent_to_fraction() {
        let settings = StoreSettings {
            tax_rate_percent: dec!(7.25),
            ..Default::default()
        };

        assert_eq!(settings.tax_rate(), dec!(0.0725));
    }

    #[test]
    fn validate_rejects_tax_rate_above_one_hundred() {
        let settings = StoreSettings {
            tax_rate_percent: dec!(100.01),
            ..Default::default()
        };

        assert_eq!(
            settings.validate(),
            Err(StoreSettingsError::InvalidTaxRate(dec!(100.01)))
        );
    }

    #[test]
    fn validate_rejects_negative_tax_rate() {
        let settings = StoreSettings {
            tax_rate_percent: dec!(-1),
            ..Default::default()
        };

        assert_eq!(
            settings.validate(),
            Err(StoreSettingsError::InvalidTaxRate(dec!(-1)))
        );
    }

    #[test]
    fn validate_rejects_blank_name() {
        let settings = StoreSettings {
            name: " ".to_string(),
            ..Default::default()
        };

        assert_eq!(settings.validate(), Err(StoreSettingsError::MissingName));
    }

    #[test]
    fn validate_rejects_blank_currency() {
        let settings = StoreSettings {
            currency: "  ".to_string(),
            ..Default::default()
        };

        assert_eq!(settings.validate(), Err(StoreSettingsError::MissingCurrency));
    }

    #[test]
    fn unlisted_currency_code_is_accepted_and_printed_as_is() {
        let settings = StoreSettings {
            currency: "sek".to_string(),
            ..Default::default()
        };

        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.currency_symbol(), "sek");
    }

    #[test]
    fn currency_symbol_falls_back_to_code() {
        let settings = StoreSettings {
            currency: "CHF".to_string(),
            ..Default::default()
        };

        assert_eq!(settings.currency_symbol(), "CHF");
        assert_eq!(StoreSettings::default().currency_symbol(), "$");
    }
}
