use dashmap::DashMap;
use jiff::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use wormhole_core::{RecordId, ShortCode, UrlRecord, UrlStatsRecord};

/// Stored state for one short code.
#[derive(Debug, Clone)]
struct Entry {
    id: u64,
    original_url: String,
    created_at: String,
    updated_at: String,
    access_count: u64,
}

impl Entry {
    fn to_record(&self, code: &str) -> UrlRecord {
        UrlRecord {
            id: RecordId::Numeric(self.id),
            original_url: self.original_url.clone(),
            short_code: ShortCode::new_unchecked(code),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    fn to_stats(&self, code: &str) -> UrlStatsRecord {
        UrlStatsRecord {
            record: self.to_record(code),
            access_count: self.access_count,
        }
    }
}

/// In-memory redirection service.
///
/// Codes are handed out sequentially as `{prefix}{n}` starting at 1,
/// so a service created with prefix `"x"` issues `x1`, `x2`, ...
#[derive(Debug)]
pub struct MemoryService {
    storage: DashMap<String, Entry>,
    counter: AtomicU64,
    prefix: String,
}

impl MemoryService {
    /// Creates a service issuing codes prefixed with `x`.
    pub fn new() -> Self {
        Self::with_prefix("x")
    }

    /// Creates a service issuing codes with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            storage: DashMap::new(),
            counter: AtomicU64::new(0),
            prefix: prefix.into(),
        }
    }

    fn next_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Stores `original_url` under a freshly generated code.
    pub fn create(&self, original_url: &str) -> UrlRecord {
        let id = self.next_id();
        let code = format!("{}{}", self.prefix, id);
        self.insert(id, code, original_url)
    }

    /// Stores `original_url` under a caller-chosen code, replacing any
    /// existing mapping. Useful for seeding records the client never created.
    pub fn seed(&self, code: &str, original_url: &str) -> UrlRecord {
        let id = self.next_id();
        self.insert(id, code.to_string(), original_url)
    }

    fn insert(&self, id: u64, code: String, original_url: &str) -> UrlRecord {
        let now = now();
        let entry = Entry {
            id,
            original_url: original_url.to_string(),
            created_at: now.clone(),
            updated_at: now,
            access_count: 0,
        };
        let record = entry.to_record(&code);
        self.storage.insert(code, entry);
        record
    }

    pub fn get(&self, code: &str) -> Option<UrlRecord> {
        self.storage.get(code).map(|entry| entry.to_record(code))
    }

    pub fn stats(&self, code: &str) -> Option<UrlStatsRecord> {
        self.storage.get(code).map(|entry| entry.to_stats(code))
    }

    pub fn update(&self, code: &str, original_url: &str) -> Option<UrlRecord> {
        let mut entry = self.storage.get_mut(code)?;
        entry.original_url = original_url.to_string();
        entry.updated_at = now();
        Some(entry.to_record(code))
    }

    /// Returns `true` if the code existed and was removed.
    pub fn delete(&self, code: &str) -> bool {
        self.storage.remove(code).is_some()
    }

    /// Follows a short link: bumps the access counter and returns the target.
    pub fn visit(&self, code: &str) -> Option<String> {
        let mut entry = self.storage.get_mut(code)?;
        entry.access_count += 1;
        Some(entry.original_url.clone())
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for MemoryService {
    fn default() -> Self {
        Self::new()
    }
}

fn now() -> String {
    Timestamp::now().to_string()
}
