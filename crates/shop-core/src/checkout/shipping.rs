//! Shipping details captured at checkout.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Where an order ships to.
///
/// Only `city` and `phone` are required; older clients send nothing else.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShippingInfo {
    /// City.
    pub city: String,
    /// Contact phone number.
    pub phone: String,
    /// Recipient name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// State/province.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Postal/ZIP code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    /// Country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ShippingInfo {
    /// Create shipping info with the required fields.
    pub fn new(city: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Set the street address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Check the required fields are present.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let mut missing = Vec::new();
        if self.city.trim().is_empty() {
            missing.push("city");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::ValidationError(format!(
                "shipping info missing {}",
                missing.join(", ")
            )))
        }
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = Vec::new();
        if let Some(ref address) = self.address {
            parts.push(address.clone());
        }
        parts.push(self.city.clone());
        if let Some(ref state) = self.state {
            parts.push(state.clone());
        }
        if let Some(ref zip) = self.zip_code {
            parts.push(zip.clone());
        }
        if let Some(ref country) = self.country {
            parts.push(country.clone());
        }
        parts.join(", ")
    }
}
