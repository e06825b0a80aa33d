use crate::backend::CacheBackend;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};
use wormhole_core::{ShortCode, UrlRecord};

/// Ordered cache of known short URLs, persisted through a [`CacheBackend`].
///
/// Records are kept most-recent-first and are unique by short code.
///
/// # Persistence
///
/// - **Open**: the backend is read once; a missing or unreadable list
///   yields an empty cache.
/// - **Mutate**: every change rewrites the full list before returning.
///   Save failures are logged and swallowed, the in-memory change stands.
#[derive(Debug)]
pub struct LocalCache<B> {
    backend: B,
    records: RwLock<Vec<UrlRecord>>,
}

impl<B: CacheBackend> LocalCache<B> {
    /// Opens the cache, loading whatever the backend holds.
    pub fn open(backend: B) -> Self {
        let records = match backend.load() {
            Ok(Some(records)) => {
                debug!(count = records.len(), "Loaded local cache");
                records
            }
            Ok(None) => {
                trace!("No stored local cache, starting empty");
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "Stored local cache is unreadable, starting empty");
                Vec::new()
            }
        };

        Self {
            backend,
            records: RwLock::new(records),
        }
    }

    /// Puts `record` first. An existing entry with the same code is dropped.
    pub fn insert_front(&self, record: UrlRecord) {
        trace!(code = %record.short_code, "Inserting record at front of local cache");

        let mut records = self.records.write();
        records.retain(|r| r.short_code != record.short_code);
        records.insert(0, record);
        self.persist(&records);
    }

    /// Replaces the entry for `code` in place.
    ///
    /// Returns `false` (and leaves storage untouched) if there is no such entry.
    pub fn replace(&self, code: &ShortCode, record: UrlRecord) -> bool {
        let mut records = self.records.write();
        let Some(slot) = records.iter_mut().find(|r| &r.short_code == code) else {
            trace!(code = %code, "Replace skipped, code not cached");
            return false;
        };

        *slot = record;
        self.persist(&records);
        debug!(code = %code, "Replaced record in local cache");
        true
    }

    /// Removes the entry for `code`, returning it if present.
    pub fn remove(&self, code: &ShortCode) -> Option<UrlRecord> {
        let mut records = self.records.write();
        let index = records.iter().position(|r| &r.short_code == code)?;

        let removed = records.remove(index);
        self.persist(&records);
        debug!(code = %code, "Removed record from local cache");
        Some(removed)
    }

    /// Snapshot of all records in display order.
    pub fn list(&self) -> Vec<UrlRecord> {
        self.records.read().clone()
    }

    /// Records whose short code or original URL contains `query`,
    /// ignoring case. An empty query returns everything.
    pub fn filter(&self, query: &str) -> Vec<UrlRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.matches_query(query))
            .cloned()
            .collect()
    }

    pub fn get(&self, code: &ShortCode) -> Option<UrlRecord> {
        self.records
            .read()
            .iter()
            .find(|r| &r.short_code == code)
            .cloned()
    }

    pub fn contains(&self, code: &ShortCode) -> bool {
        self.records.read().iter().any(|r| &r.short_code == code)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // Called with the write lock held so saves land in mutation order.
    fn persist(&self, records: &[UrlRecord]) {
        if let Err(err) = self.backend.save(records) {
            warn!(error = %err, "Failed to persist local cache, keeping in-memory state");
        }
    }
}
