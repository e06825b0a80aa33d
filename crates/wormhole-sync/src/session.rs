use crate::clipboard::Clipboard;
use crate::error::{ErrorSlot, Result, SessionError};
use crate::interaction::{CopyFeedback, CopyVariant, EditSession, InteractionState};
use crate::search::{SearchPhase, SearchResolver, SearchState, SearchView};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use typed_builder::TypedBuilder;
use wormhole_cache::{CacheBackend, LocalCache};
use wormhole_core::{
    validate_url, ShortCode, UrlApi, UrlRecord, UrlStatsRecord, DEFAULT_REDIRECT_BASE_URL,
};

#[derive(Debug, Clone, TypedBuilder)]
pub struct SessionConfig {
    /// Quiet period before a search query is looked up remotely.
    #[builder(default = Duration::from_millis(300))]
    pub debounce: Duration,

    /// How long copy feedback stays visible.
    #[builder(default = Duration::from_secs(2))]
    pub copy_feedback: Duration,

    #[builder(default = DEFAULT_REDIRECT_BASE_URL.to_string(), setter(into))]
    pub redirect_base_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Everything a presentation layer renders in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub search: SearchView,
    pub edit: Option<EditSession>,
    pub copy_feedback: Option<CopyFeedback>,
    pub error: Option<String>,
}

/// The long-lived client state: known records, search, transient
/// interaction state and the current error message.
///
/// Mutations go to the remote service first; the local cache only changes
/// after the service accepted them. Failures of user actions replace the
/// error message with a fixed per-action text, search failures never do.
/// An answered search lookup clears the message.
///
/// Update and delete refuse to start while another update or delete for
/// the same short code is in flight.
pub struct Session<A, B> {
    api: Arc<A>,
    cache: LocalCache<B>,
    search: SearchResolver<A>,
    interaction: InteractionState,
    clipboard: Box<dyn Clipboard>,
    redirect_base_url: String,
    error: ErrorSlot,
    in_flight: Mutex<HashSet<ShortCode>>,
}

impl<A: UrlApi, B: CacheBackend> Session<A, B> {
    pub fn new(
        api: A,
        cache: LocalCache<B>,
        clipboard: impl Clipboard + 'static,
        config: SessionConfig,
    ) -> Self {
        let api = Arc::new(api);
        let error = ErrorSlot::default();
        Self {
            search: SearchResolver::new(Arc::clone(&api), config.debounce, Arc::clone(&error)),
            api,
            cache,
            interaction: InteractionState::new(config.copy_feedback),
            clipboard: Box::new(clipboard),
            redirect_base_url: config.redirect_base_url,
            error,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Shortens `original_url` and puts the new record first.
    ///
    /// Clears the previous error message before trying.
    #[instrument(skip(self))]
    pub async fn create(&self, original_url: &str) -> Result<UrlRecord> {
        self.clear_error();
        validate_url(original_url)
            .map_err(|e| self.report(SessionError::InvalidUrl(e.to_string())))?;

        let record = self
            .api
            .create(original_url)
            .await
            .map_err(|e| self.report(e.into()))?;

        info!(code = %record.short_code, "Created short url");
        self.cache.insert_front(record.clone());
        Ok(record)
    }

    /// Fetches statistics for `code`.
    ///
    /// The result is kept for display only while `code` is cached; a
    /// response for a record deleted in the meantime is returned but not kept.
    #[instrument(skip_all, fields(code = %code))]
    pub async fn fetch_stats(&self, code: &ShortCode) -> Result<UrlStatsRecord> {
        let stats = self
            .api
            .fetch_stats(code)
            .await
            .map_err(|e| self.report(e.into()))?;

        if self.cache.contains(code) {
            self.interaction.store_stats(stats.clone());
        } else {
            debug!(code = %code, "Not keeping stats for uncached record");
        }
        Ok(stats)
    }

    pub fn stats(&self, code: &ShortCode) -> Option<UrlStatsRecord> {
        self.interaction.stats(code)
    }

    /// Opens an edit of the cached record for `code`.
    pub fn begin_edit(&self, code: &ShortCode) -> Result<EditSession> {
        let record = self
            .cache
            .get(code)
            .ok_or_else(|| SessionError::UnknownRecord(code.clone()))?;
        Ok(self.interaction.begin_edit(&record))
    }

    pub fn set_draft(&self, draft_url: impl Into<String>) -> Result<()> {
        if self.interaction.set_draft(draft_url) {
            Ok(())
        } else {
            Err(SessionError::NoEditSession)
        }
    }

    pub fn edit(&self) -> Option<EditSession> {
        self.interaction.edit()
    }

    /// Sends the draft of the open edit to the service.
    ///
    /// On success the cached record is replaced in place and the edit
    /// closes, unless it was replaced by another edit in the meantime. On
    /// failure the edit stays open with its draft.
    #[instrument(skip(self))]
    pub async fn commit_edit(&self) -> Result<UrlRecord> {
        let edit = self.interaction.edit().ok_or(SessionError::NoEditSession)?;
        let code = &edit.short_code;
        let _guard = self.begin_mutation(code)?;

        let updated = self
            .api
            .update(code, &edit.draft_url)
            .await
            .map_err(|e| self.report(e.into()))?;

        info!(code = %code, "Updated short url");
        self.cache.replace(code, updated.clone());
        self.interaction.finish_edit(&edit);
        Ok(updated)
    }

    pub fn cancel_edit(&self) {
        self.interaction.cancel_edit();
    }

    /// Deletes `code` remotely, then drops it and everything that refers
    /// to it locally.
    #[instrument(skip_all, fields(code = %code))]
    pub async fn delete(&self, code: &ShortCode) -> Result<()> {
        let _guard = self.begin_mutation(code)?;

        self.api
            .delete(code)
            .await
            .map_err(|e| self.report(e.into()))?;

        info!(code = %code, "Deleted short url");
        self.cache.remove(code);
        self.interaction.forget(code);
        self.search.clear_result_for(code);
        Ok(())
    }

    /// Copies the short code or its redirect URL and returns the copied text.
    pub async fn copy(&self, code: &ShortCode, variant: CopyVariant) -> Result<String> {
        let text = match variant {
            CopyVariant::Short => code.to_string(),
            CopyVariant::Full => self.redirect_url(code),
        };

        self.clipboard
            .write_text(&text)
            .map_err(|e| self.report(e.into()))?;

        debug!(code = %code, %variant, "Copied to clipboard");
        self.interaction.record_copy(code, variant);
        Ok(text)
    }

    pub fn copy_feedback(&self) -> Option<CopyFeedback> {
        self.interaction.copy_feedback()
    }

    /// Replaces the search query. Must be called within a tokio runtime.
    pub fn set_query(&self, query: impl Into<String>) {
        self.search.set_query(query);
    }

    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    pub fn search_phase(&self) -> SearchPhase {
        self.search.phase()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            search: self.search.view(&self.cache),
            edit: self.interaction.edit(),
            copy_feedback: self.interaction.copy_feedback(),
            error: self.error(),
        }
    }

    /// All cached records, most recent first.
    pub fn records(&self) -> Vec<UrlRecord> {
        self.cache.list()
    }

    pub fn cache(&self) -> &LocalCache<B> {
        &self.cache
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn redirect_url(&self, code: &ShortCode) -> String {
        code.to_url(&self.redirect_base_url)
    }

    pub fn error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    pub fn clear_error(&self) {
        *self.error.lock() = None;
    }

    fn report(&self, err: SessionError) -> SessionError {
        if let Some(message) = err.user_message() {
            warn!(error = %err, "{message}");
            *self.error.lock() = Some(message.to_string());
        }
        err
    }

    fn begin_mutation(&self, code: &ShortCode) -> Result<InFlightGuard<'_>> {
        if !self.in_flight.lock().insert(code.clone()) {
            debug!(code = %code, "Mutation already in flight");
            return Err(SessionError::InFlight(code.clone()));
        }
        Ok(InFlightGuard {
            in_flight: &self.in_flight,
            code: code.clone(),
        })
    }
}

/// Releases a short code's in-flight mark when the mutation ends.
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<ShortCode>>,
    code: ShortCode,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.code);
    }
}
