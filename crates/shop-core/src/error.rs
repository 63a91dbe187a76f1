//! Commerce error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur in cart, order and checkout operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// No verified caller identity.
    #[error("Authentication required")]
    Unauthenticated,

    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Order not found (or not owned by the caller).
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Negative unit price handed to the pricing calculator.
    #[error("Invalid price: {0} cents")]
    InvalidPrice(i64),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Checkout attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Order status transition not allowed.
    #[error("Invalid order status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Order id already taken.
    #[error("Duplicate order id: {0}")]
    DuplicateOrderId(String),

    /// Every generated order id collided.
    #[error("Could not allocate a unique order id after {0} attempts")]
    OrderIdExhausted(u32),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// A store call did not complete in time.
    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    /// Storage backend error.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CommerceError {
    /// Map this error onto the category exposed to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::Unauthenticated => ErrorKind::Unauthenticated,
            CommerceError::ProductNotFound(_)
            | CommerceError::ItemNotInCart(_)
            | CommerceError::OrderNotFound(_) => ErrorKind::NotFound,
            CommerceError::InvalidQuantity(_)
            | CommerceError::QuantityExceedsLimit(_, _)
            | CommerceError::InvalidPrice(_)
            | CommerceError::ValidationError(_) => ErrorKind::InvalidArgument,
            CommerceError::EmptyCart | CommerceError::InvalidStatusTransition { .. } => {
                ErrorKind::InvalidState
            }
            CommerceError::DuplicateOrderId(_) => ErrorKind::Conflict,
            CommerceError::OrderIdExhausted(_)
            | CommerceError::Overflow
            | CommerceError::Timeout(_)
            | CommerceError::StorageError(_)
            | CommerceError::ConfigError(_) => ErrorKind::Internal,
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::ConfigError(e.to_string())
    }
}

impl From<toml::de::Error> for CommerceError {
    fn from(e: toml::de::Error) -> Self {
        CommerceError::ConfigError(e.to_string())
    }
}

/// Error categories surfaced at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthenticated,
    NotFound,
    InvalidArgument,
    InvalidState,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        }
    }

    /// HTTP status code for this category.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Unauthenticated => 401,
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidArgument | ErrorKind::InvalidState => 400,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(CommerceError::Unauthenticated.kind(), ErrorKind::Unauthenticated);
        assert_eq!(
            CommerceError::ItemNotInCart("p1".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(CommerceError::InvalidQuantity(0).kind(), ErrorKind::InvalidArgument);
        assert_eq!(CommerceError::EmptyCart.kind(), ErrorKind::InvalidState);
        assert_eq!(
            CommerceError::DuplicateOrderId("ORD-1".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(CommerceError::OrderIdExhausted(3).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::Unauthenticated.status_code(), 401);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::InvalidState.status_code(), 400);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::Internal.status_code(), 500);
    }
}
