use crate::backend::{decode, encode, CacheBackend};
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use wormhole_core::UrlRecord;

/// An in-memory backend holding the serialized list.
///
/// Clones share the same slot, so dropping a [`LocalCache`](crate::LocalCache)
/// and opening a new one over a clone behaves like a process restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-loaded with raw stored contents.
    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// Returns the raw stored contents, if any.
    pub fn contents(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl CacheBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Vec<UrlRecord>>> {
        self.slot.lock().as_deref().map(decode).transpose()
    }

    fn save(&self, records: &[UrlRecord]) -> Result<()> {
        let raw = encode(records)?;
        *self.slot.lock() = Some(raw);
        Ok(())
    }
}
