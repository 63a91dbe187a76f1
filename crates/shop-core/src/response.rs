//! Response envelope returned to the transport layer.

use crate::error::{CommerceError, ErrorKind};
use serde::{Deserialize, Serialize};

/// Error detail in a failed response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiError {
    /// Category, which decides the status code.
    pub kind: ErrorKind,
    /// Human-readable cause.
    pub detail: String,
}

/// One response per operation: a success flag, a message, and either a
/// data payload or an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    /// Successful response with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Failed response.
    pub fn failure(message: impl Into<String>, err: &CommerceError) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(ApiError {
                kind: err.kind(),
                detail: err.to_string(),
            }),
        }
    }

    /// Build from an operation result.
    pub fn from_result(
        result: Result<T, CommerceError>,
        success_message: impl Into<String>,
        failure_message: impl Into<String>,
    ) -> Self {
        match result {
            Ok(data) => Self::ok(success_message, data),
            Err(e) => Self::failure(failure_message, &e),
        }
    }

    /// HTTP status code for this response.
    pub fn status_code(&self) -> u16 {
        match &self.error {
            Some(error) => error.kind.status_code(),
            None => 200,
        }
    }

    /// Error category, if the call failed.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}
