//! Payment details recorded on an order.
//!
//! Nothing here talks to a payment processor; the fields are stored as
//! given.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the customer says they paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "credit_card", alias = "credit-card")]
    CreditCard,
    #[serde(rename = "debit_card")]
    DebitCard,
    #[serde(rename = "paypal")]
    PayPal,
    #[serde(rename = "apple-pay")]
    ApplePay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::PayPal => "paypal",
            PaymentMethod::ApplePay => "apple-pay",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = CommerceError;

    /// Parse a method name, accepting the legacy `credit-card` spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" | "credit-card" => Ok(PaymentMethod::CreditCard),
            "debit_card" => Ok(PaymentMethod::DebitCard),
            "paypal" => Ok(PaymentMethod::PayPal),
            "apple-pay" => Ok(PaymentMethod::ApplePay),
            other => Err(CommerceError::ValidationError(format!(
                "unknown payment method: {}",
                other
            ))),
        }
    }
}

/// Payment details as submitted at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentInfo {
    /// Payment method.
    pub method: PaymentMethod,
    /// Last four digits of the card, when paying by card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_last4: Option<String>,
    /// Processor reference, if the client has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_ref: Option<String>,
}

impl PaymentInfo {
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            method,
            card_last4: None,
            transaction_ref: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_credit_card_spelling() {
        let legacy: PaymentInfo = serde_json::from_str(r#"{"method":"credit-card"}"#).unwrap();
        assert_eq!(legacy.method, PaymentMethod::CreditCard);

        // Stored in the canonical spelling.
        let json = serde_json::to_string(&legacy).unwrap();
        assert_eq!(json, r#"{"method":"credit_card"}"#);
    }

    #[test]
    fn test_method_names() {
        for method in [
            PaymentMethod::CreditCard,
            PaymentMethod::DebitCard,
            PaymentMethod::PayPal,
            PaymentMethod::ApplePay,
        ] {
            assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), method);
        }
        assert_eq!(
            "credit-card".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::CreditCard
        );
        assert!(matches!(
            "bitcoin".parse::<PaymentMethod>(),
            Err(CommerceError::ValidationError(_))
        ));
    }

    #[test]
    fn test_unknown_method_rejected() {
        assert!(serde_json::from_str::<PaymentInfo>(r#"{"method":"cash"}"#).is_err());
    }
}
