use crate::api::Operation;
use thiserror::Error;

/// Result type for remote API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// The single failure kind surfaced by a [`UrlApi`](crate::UrlApi).
///
/// Transport errors and non-success statuses both collapse into
/// `RequestFailed`; the operation is carried along so callers can pick
/// an operation-specific message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{operation} request failed: {reason}")]
    RequestFailed { operation: Operation, reason: String },
}

impl ApiError {
    pub fn request_failed(operation: Operation, reason: impl Into<String>) -> Self {
        Self::RequestFailed {
            operation,
            reason: reason.into(),
        }
    }

    /// Returns the operation that failed.
    pub fn operation(&self) -> Operation {
        match self {
            ApiError::RequestFailed { operation, .. } => *operation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}
