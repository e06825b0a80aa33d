use thiserror::Error;

/// Type alias for persistence results.
pub type Result<T> = std::result::Result<T, PersistenceError>;

#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    #[error("cache storage unavailable: {0}")]
    Unavailable(String),
    #[error("cache serialization failed: {0}")]
    Serialization(String),
    #[error("cached value is invalid: {0}")]
    InvalidData(String),
}
