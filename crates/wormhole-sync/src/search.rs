use crate::error::ErrorSlot;
use crate::scheduler::{TaskSlot, Ticket};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};
use wormhole_cache::{CacheBackend, LocalCache};
use wormhole_core::{ShortCode, UrlApi, UrlRecord};

/// Where the resolver is for the current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// The query is blank.
    Idle,
    /// Waiting for the query to stay unchanged for the quiet period.
    Debouncing,
    /// Remote lookup in flight.
    Searching,
    /// The remote lookup for the current query has settled.
    Resolved,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    /// The remote answer for `query`, if it had one.
    pub result: Option<UrlRecord>,
    pub is_searching: bool,
}

/// What to display for the current query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    /// Cached records matching the query, in cache order.
    pub records: Vec<UrlRecord>,
    /// The remote result, unless it is already among `records`.
    pub remote: Option<UrlRecord>,
    pub is_searching: bool,
}

#[derive(Debug)]
struct SearchInner {
    state: SearchState,
    phase: SearchPhase,
    slot: TaskSlot,
}

/// Resolves free-text queries against the remote service.
///
/// Each query change supersedes whatever the previous query scheduled.
/// After the query has been quiet for `debounce`, the trimmed query is
/// looked up as a short code. A lookup that completes after its query was
/// replaced is discarded. Failed lookups yield no result and are never
/// reported to the user; an answered lookup clears the shared error message.
/// Queries of `.` or `..` resolve to no result without a lookup.
///
/// Query changes spawn onto the ambient tokio runtime.
pub struct SearchResolver<A> {
    api: Arc<A>,
    debounce: Duration,
    error: ErrorSlot,
    inner: Arc<Mutex<SearchInner>>,
}

impl<A: UrlApi> SearchResolver<A> {
    pub fn new(api: Arc<A>, debounce: Duration, error: ErrorSlot) -> Self {
        Self {
            api,
            debounce,
            error,
            inner: Arc::new(Mutex::new(SearchInner {
                state: SearchState::default(),
                phase: SearchPhase::Idle,
                slot: TaskSlot::new(),
            })),
        }
    }

    /// Replaces the query. Setting the same query again is a no-op.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        let mut inner = self.inner.lock();
        if inner.state.query == query {
            return;
        }

        let ticket = inner.slot.next();
        let candidate = query.trim().to_string();
        inner.state = SearchState {
            query,
            result: None,
            is_searching: false,
        };

        if candidate.is_empty() {
            trace!("Search query cleared");
            inner.phase = SearchPhase::Idle;
            return;
        }

        let code = ShortCode::new_unchecked(candidate);
        if code.is_dot_segment() {
            trace!(code = %code, "Search query cannot name a short code");
            inner.phase = SearchPhase::Resolved;
            return;
        }

        inner.phase = SearchPhase::Debouncing;
        let task = tokio::spawn(lookup_when_quiet(
            Arc::clone(&self.api),
            Arc::clone(&self.inner),
            Arc::clone(&self.error),
            ticket,
            code,
            self.debounce,
        ));
        inner.slot.attach(ticket, task.abort_handle());
    }

    pub fn state(&self) -> SearchState {
        self.inner.lock().state.clone()
    }

    pub fn phase(&self) -> SearchPhase {
        self.inner.lock().phase
    }

    /// Merges the cached matches for the current query with the remote result.
    pub fn view<B: CacheBackend>(&self, cache: &LocalCache<B>) -> SearchView {
        let state = self.state();
        let records = cache.filter(&state.query);
        let remote = state
            .result
            .filter(|found| !records.iter().any(|r| r.short_code == found.short_code));

        SearchView {
            records,
            remote,
            is_searching: state.is_searching,
        }
    }

    /// Drops the remote result if it is the record for `code`.
    ///
    /// A pending lookup of `code` is abandoned as well, so a response that
    /// was already on its way cannot bring the record back.
    pub fn clear_result_for(&self, code: &ShortCode) {
        let mut inner = self.inner.lock();
        if inner.slot.is_pending() && inner.state.query.trim() == code.as_str() {
            debug!(code = %code, "Abandoning lookup for removed record");
            inner.slot.cancel();
            inner.phase = SearchPhase::Resolved;
            inner.state.is_searching = false;
        }
        if inner
            .state
            .result
            .as_ref()
            .is_some_and(|r| &r.short_code == code)
        {
            debug!(code = %code, "Clearing search result for removed record");
            inner.state.result = None;
        }
    }
}

impl<A> Drop for SearchResolver<A> {
    fn drop(&mut self) {
        self.inner.lock().slot.cancel();
    }
}

async fn lookup_when_quiet<A: UrlApi>(
    api: Arc<A>,
    inner: Arc<Mutex<SearchInner>>,
    error: ErrorSlot,
    ticket: Ticket,
    code: ShortCode,
    debounce: Duration,
) {
    tokio::time::sleep(debounce).await;

    {
        let mut guard = inner.lock();
        if !guard.slot.is_current(ticket) {
            return;
        }
        guard.phase = SearchPhase::Searching;
        guard.state.is_searching = true;
    }

    trace!(code = %code, "Looking up search query");
    let outcome = api.lookup(&code).await;

    let mut guard = inner.lock();
    if !guard.slot.finish(ticket) {
        trace!(code = %code, "Discarding lookup for superseded query");
        return;
    }

    guard.phase = SearchPhase::Resolved;
    guard.state.is_searching = false;
    guard.state.result = match outcome {
        Ok(found) => {
            *error.lock() = None;
            found
        }
        Err(err) => {
            debug!(code = %code, error = %err, "Search lookup failed");
            None
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use wormhole_cache::MemoryBackend;
    use wormhole_core::Operation;
    use wormhole_test_infra::FakeUrlApi;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn resolver(api: &Arc<FakeUrlApi>) -> SearchResolver<FakeUrlApi> {
        SearchResolver::new(Arc::clone(api), DEBOUNCE, ErrorSlot::default())
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_issues_one_lookup() {
        let api = Arc::new(FakeUrlApi::new());
        let search = resolver(&api);

        search.set_query("a");
        advance(100).await;
        search.set_query("ab");
        advance(100).await;
        search.set_query("abc");
        assert_eq!(search.phase(), SearchPhase::Debouncing);
        advance(400).await;

        assert_eq!(api.calls_for(Operation::Lookup), vec!["abc"]);
        assert_eq!(search.phase(), SearchPhase::Resolved);
    }

    #[tokio::test(start_paused = true)]
    async fn found_record_becomes_result() {
        let api = Arc::new(FakeUrlApi::new());
        let record = api.service().create("https://example.com");
        let search = resolver(&api);

        search.set_query("  x1 ");
        advance(400).await;

        let state = search.state();
        assert_eq!(state.query, "  x1 ");
        assert_eq!(state.result, Some(record));
        assert!(!state.is_searching);
        assert_eq!(api.calls_for(Operation::Lookup), vec!["x1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_query_discards_in_flight_lookup() {
        let api = Arc::new(FakeUrlApi::new());
        api.service().seed("xyz", "https://example.com");
        api.set_latency(Operation::Lookup, Duration::from_secs(1));
        let search = resolver(&api);

        search.set_query("xyz");
        advance(400).await;
        assert_eq!(search.phase(), SearchPhase::Searching);
        assert!(search.state().is_searching);

        search.set_query("");
        advance(2000).await;

        assert_eq!(search.phase(), SearchPhase::Idle);
        assert_eq!(search.state(), SearchState::default());
        assert_eq!(api.calls_for(Operation::Lookup), vec!["xyz"]);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_query_wins_over_slower_older_lookup() {
        let api = Arc::new(FakeUrlApi::new());
        api.service().seed("old", "https://old.example");
        let new = api.service().seed("new", "https://new.example");
        api.set_latency(Operation::Lookup, Duration::from_millis(500));
        let search = resolver(&api);

        search.set_query("old");
        advance(400).await;
        search.set_query("new");
        advance(1000).await;

        assert_eq!(api.calls_for(Operation::Lookup), vec!["old", "new"]);
        assert_eq!(search.state().result, Some(new));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_or_missing_lookup_has_no_result() {
        let api = Arc::new(FakeUrlApi::new());
        let search = resolver(&api);

        search.set_query("missing");
        advance(400).await;
        assert_eq!(search.phase(), SearchPhase::Resolved);
        assert!(search.state().result.is_none());

        api.fail(Operation::Lookup);
        search.set_query("other");
        advance(400).await;
        assert_eq!(search.phase(), SearchPhase::Resolved);
        assert!(search.state().result.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn blank_query_never_looks_up() {
        let api = Arc::new(FakeUrlApi::new());
        let search = resolver(&api);

        search.set_query("   ");
        advance(400).await;

        assert_eq!(search.phase(), SearchPhase::Idle);
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn same_query_does_not_restart() {
        let api = Arc::new(FakeUrlApi::new());
        let search = resolver(&api);

        search.set_query("abc");
        advance(200).await;
        search.set_query("abc");
        advance(150).await;

        assert_eq!(api.calls_for(Operation::Lookup), vec!["abc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn view_hides_remote_result_already_cached() {
        let api = Arc::new(FakeUrlApi::new());
        let cached = api.service().seed("abc1", "https://cached.example");
        let cache = LocalCache::open(MemoryBackend::new());
        cache.insert_front(cached.clone());
        let search = resolver(&api);

        search.set_query("abc1");
        advance(400).await;

        assert_eq!(search.state().result, Some(cached.clone()));
        let view = search.view(&cache);
        assert_eq!(view.records, vec![cached]);
        assert!(view.remote.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn view_shows_uncached_remote_result() {
        let api = Arc::new(FakeUrlApi::new());
        let remote = api.service().seed("zz9", "https://remote.example");
        let cache = LocalCache::open(MemoryBackend::new());
        cache.insert_front(api.service().create("https://local.example"));
        let search = resolver(&api);

        search.set_query("zz9");
        advance(400).await;

        let view = search.view(&cache);
        assert!(view.records.is_empty());
        assert_eq!(view.remote, Some(remote));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_result_for_matching_code() {
        let api = Arc::new(FakeUrlApi::new());
        api.service().seed("zz9", "https://remote.example");
        let search = resolver(&api);
        search.set_query("zz9");
        advance(400).await;

        search.clear_result_for(&ShortCode::new_unchecked("other"));
        assert!(search.state().result.is_some());

        search.clear_result_for(&ShortCode::new_unchecked("zz9"));
        assert!(search.state().result.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dot_segment_queries_resolve_without_lookup() {
        let api = Arc::new(FakeUrlApi::new());
        let search = resolver(&api);

        for query in [".", " .. "] {
            search.set_query(query);
            advance(400).await;

            assert_eq!(search.phase(), SearchPhase::Resolved);
            assert!(search.state().result.is_none());
            assert!(!search.state().is_searching);
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn answered_lookup_clears_error_message() {
        let api = Arc::new(FakeUrlApi::new());
        let error = ErrorSlot::default();
        let search = SearchResolver::new(Arc::clone(&api), DEBOUNCE, Arc::clone(&error));

        *error.lock() = Some("Failed to delete URL.".to_string());
        api.fail(Operation::Lookup);
        search.set_query("abc");
        advance(400).await;
        assert_eq!(error.lock().as_deref(), Some("Failed to delete URL."));

        api.recover(Operation::Lookup);
        search.set_query("missing");
        advance(400).await;
        assert!(error.lock().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_a_code_abandons_its_pending_lookup() {
        let api = Arc::new(FakeUrlApi::new());
        api.service().seed("zz9", "https://remote.example");
        api.set_latency(Operation::Lookup, Duration::from_millis(500));
        let search = resolver(&api);

        search.set_query("zz9");
        advance(400).await;
        assert_eq!(search.phase(), SearchPhase::Searching);

        search.clear_result_for(&ShortCode::new_unchecked("zz9"));
        assert_eq!(search.phase(), SearchPhase::Resolved);
        advance(1000).await;

        assert!(search.state().result.is_none());
        assert!(!search.state().is_searching);
    }
}
