use crate::error::{PersistenceError, Result};
use std::sync::Arc;
use wormhole_core::UrlRecord;

/// Fixed key the serialized record list is stored under.
pub const STORAGE_KEY: &str = "shortenedUrls";

/// Durable storage for the local cache.
///
/// The whole ordered list is written on every save; there is no partial
/// update. Calls are synchronous so a completed mutation is durable before
/// the caller moves on.
pub trait CacheBackend: Send + Sync + 'static {
    /// Reads the stored list.
    ///
    /// Returns `Ok(None)` if nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<UrlRecord>>>;

    /// Replaces the stored list with `records`.
    fn save(&self, records: &[UrlRecord]) -> Result<()>;
}

impl<T: CacheBackend + ?Sized> CacheBackend for Arc<T> {
    fn load(&self) -> Result<Option<Vec<UrlRecord>>> {
        (**self).load()
    }

    fn save(&self, records: &[UrlRecord]) -> Result<()> {
        (**self).save(records)
    }
}

pub(crate) fn encode(records: &[UrlRecord]) -> Result<String> {
    serde_json::to_string(records).map_err(|e| PersistenceError::Serialization(e.to_string()))
}

pub(crate) fn decode(raw: &str) -> Result<Vec<UrlRecord>> {
    serde_json::from_str(raw).map_err(|e| PersistenceError::InvalidData(e.to_string()))
}
