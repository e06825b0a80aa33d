use thiserror::Error;

/// Errors raised while constructing an [`HttpUrlApi`](crate::HttpUrlApi).
///
/// Request-time failures are reported as [`wormhole_core::ApiError`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Build(#[from] reqwest::Error),
}
