use crate::scheduler::TaskSlot;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;
use wormhole_core::{ShortCode, UrlRecord, UrlStatsRecord};

/// Which form of a short link was copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyVariant {
    /// The bare short code.
    Short,
    /// The full redirect URL.
    Full,
}

impl Display for CopyVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CopyVariant::Short => f.write_str("short"),
            CopyVariant::Full => f.write_str("full"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub short_code: ShortCode,
    pub draft_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFeedback {
    pub short_code: ShortCode,
    pub variant: CopyVariant,
}

#[derive(Debug, Default)]
struct Inner {
    edit: Option<EditSession>,
    copy: Option<CopyFeedback>,
    copy_slot: TaskSlot,
    stats: HashMap<ShortCode, UrlStatsRecord>,
}

/// Transient per-record state: the open edit, the copy acknowledgement and
/// fetched statistics. Nothing here is persisted.
#[derive(Debug)]
pub struct InteractionState {
    inner: Arc<Mutex<Inner>>,
    copy_window: Duration,
}

impl InteractionState {
    pub fn new(copy_window: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            copy_window,
        }
    }

    /// Opens an edit of `record`, replacing any other open edit.
    pub fn begin_edit(&self, record: &UrlRecord) -> EditSession {
        let session = EditSession {
            short_code: record.short_code.clone(),
            draft_url: record.original_url.clone(),
        };
        self.inner.lock().edit = Some(session.clone());
        session
    }

    /// Returns `false` if no edit is open.
    pub fn set_draft(&self, draft_url: impl Into<String>) -> bool {
        match self.inner.lock().edit.as_mut() {
            Some(session) => {
                session.draft_url = draft_url.into();
                true
            }
            None => false,
        }
    }

    pub fn edit(&self) -> Option<EditSession> {
        self.inner.lock().edit.clone()
    }

    pub fn cancel_edit(&self) {
        self.inner.lock().edit = None;
    }

    /// Closes the open edit if it is still `committed`.
    ///
    /// An edit reopened or redrafted after the commit started stays open.
    pub fn finish_edit(&self, committed: &EditSession) {
        let mut inner = self.inner.lock();
        if inner.edit.as_ref() == Some(committed) {
            inner.edit = None;
        }
    }

    /// Shows copy feedback for `code` until the copy window elapses or
    /// another copy replaces it. Must be called within a tokio runtime.
    pub fn record_copy(&self, code: &ShortCode, variant: CopyVariant) {
        let mut inner = self.inner.lock();
        let ticket = inner.copy_slot.next();
        inner.copy = Some(CopyFeedback {
            short_code: code.clone(),
            variant,
        });

        let shared = Arc::clone(&self.inner);
        let window = self.copy_window;
        let task = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let mut inner = shared.lock();
            if inner.copy_slot.finish(ticket) {
                trace!("Copy feedback expired");
                inner.copy = None;
            }
        });
        inner.copy_slot.attach(ticket, task.abort_handle());
    }

    pub fn copy_feedback(&self) -> Option<CopyFeedback> {
        self.inner.lock().copy.clone()
    }

    pub fn store_stats(&self, stats: UrlStatsRecord) {
        self.inner
            .lock()
            .stats
            .insert(stats.short_code().clone(), stats);
    }

    pub fn stats(&self, code: &ShortCode) -> Option<UrlStatsRecord> {
        self.inner.lock().stats.get(code).cloned()
    }

    /// Drops every piece of state that refers to `code`.
    pub fn forget(&self, code: &ShortCode) {
        let mut inner = self.inner.lock();
        if inner.edit.as_ref().is_some_and(|e| &e.short_code == code) {
            inner.edit = None;
        }
        if inner.copy.as_ref().is_some_and(|c| &c.short_code == code) {
            inner.copy = None;
            inner.copy_slot.cancel();
        }
        inner.stats.remove(code);
    }
}

impl Drop for InteractionState {
    fn drop(&mut self) {
        self.inner.lock().copy_slot.cancel();
    }
}
