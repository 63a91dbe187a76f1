//! Pipeline configuration.

use crate::error::CommerceError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Pricing configuration.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Checkout configuration.
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

impl ShopConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CommerceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CommerceError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;

        let config: ShopConfig = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, CommerceError> {
        let config: ShopConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.pricing.shipping_flat.is_sign_negative() {
            return Err(CommerceError::ConfigError(
                "pricing.shipping_flat must not be negative".to_string(),
            ));
        }
        if self.pricing.tax_rate.is_sign_negative() || self.pricing.tax_rate > Decimal::ONE {
            return Err(CommerceError::ConfigError(
                "pricing.tax_rate must be between 0 and 1".to_string(),
            ));
        }
        if self.checkout.max_id_attempts == 0 {
            return Err(CommerceError::ConfigError(
                "checkout.max_id_attempts must be at least 1".to_string(),
            ));
        }
        if self.checkout.store_timeout_ms == 0 {
            return Err(CommerceError::ConfigError(
                "checkout.store_timeout_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Pricing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Flat shipping charge per order.
    #[serde(default = "default_shipping_flat")]
    pub shipping_flat: Decimal,

    /// Tax rate applied to the subtotal, as a fraction.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
}

fn default_shipping_flat() -> Decimal {
    Decimal::new(599, 2)
}

fn default_tax_rate() -> Decimal {
    crate::cart::default_tax_rate()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            shipping_flat: default_shipping_flat(),
            tax_rate: default_tax_rate(),
        }
    }
}

/// Checkout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Total attempts at persisting an order before giving up on id
    /// collisions.
    #[serde(default = "default_max_id_attempts")]
    pub max_id_attempts: u32,

    /// Upper bound on any single store call, in milliseconds.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

fn default_max_id_attempts() -> u32 {
    3
}

fn default_store_timeout_ms() -> u64 {
    5_000
}

impl CheckoutConfig {
    /// Store call timeout.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            max_id_attempts: default_max_id_attempts(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShopConfig::default();
        assert_eq!(config.pricing.shipping_flat, Decimal::new(599, 2));
        assert_eq!(config.pricing.tax_rate, Decimal::new(8, 2));
        assert_eq!(config.checkout.max_id_attempts, 3);
        assert_eq!(config.checkout.store_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_toml() {
        let config = ShopConfig::from_toml_str(
            r#"
            [pricing]
            tax_rate = 0.1

            [checkout]
            max_id_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.tax_rate, Decimal::new(1, 1));
        assert_eq!(config.pricing.shipping_flat, Decimal::new(599, 2));
        assert_eq!(config.checkout.max_id_attempts, 5);
        assert_eq!(config.checkout.store_timeout_ms, 5_000);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        assert_eq!(ShopConfig::from_toml_str("").unwrap(), ShopConfig::default());
    }

    #[test]
    fn test_validation() {
        let err = ShopConfig::from_toml_str("[pricing]\ntax_rate = 1.5\n").unwrap_err();
        assert!(matches!(err, CommerceError::ConfigError(_)));

        let err = ShopConfig::from_toml_str("[checkout]\nmax_id_attempts = 0\n").unwrap_err();
        assert!(matches!(err, CommerceError::ConfigError(_)));
    }

    #[test]
    fn test_load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("shop.json");
        std::fs::write(
            &json,
            r#"{ "pricing": { "tax_rate": "0.07" }, "checkout": { "store_timeout_ms": 250 } }"#,
        )
        .unwrap();
        let config = ShopConfig::load(&json).unwrap();
        assert_eq!(config.pricing.tax_rate, Decimal::new(7, 2));
        assert_eq!(config.pricing.shipping_flat, Decimal::new(599, 2));
        assert_eq!(config.checkout.store_timeout(), Duration::from_millis(250));

        let toml = dir.path().join("shop.toml");
        std::fs::write(&toml, "[pricing]\nshipping_flat = 4.5\n").unwrap();
        let config = ShopConfig::load(&toml).unwrap();
        assert_eq!(config.pricing.shipping_flat, Decimal::new(45, 1));
        assert_eq!(config.pricing.tax_rate, Decimal::new(8, 2));

        // JSON content under a .toml name is parsed as TOML and rejected.
        let misnamed = dir.path().join("misnamed.toml");
        std::fs::write(&misnamed, r#"{ "pricing": {} }"#).unwrap();
        assert!(ShopConfig::load(&misnamed).is_err());
    }

    #[test]
    fn test_load_validates_and_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let invalid = dir.path().join("shop.json");
        std::fs::write(&invalid, r#"{ "checkout": { "max_id_attempts": 0 } }"#).unwrap();
        let err = ShopConfig::load(&invalid).unwrap_err();
        assert!(matches!(err, CommerceError::ConfigError(_)));

        let err = ShopConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CommerceError::ConfigError(_)));
    }
}
