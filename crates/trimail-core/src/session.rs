//! Mailbox session: the stateful owner of the cache and the policies
//! that decide when to hit the network.
//!
//! A [`MailboxSession`] is created at login, shared by reference with every
//! consumer, and torn down with [`MailboxSession::clear_cache`] at logout.
//! All methods take `&self`; the cache lives behind a mutex that is never
//! held across an await point, and the in-flight markers are atomics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::{debug, warn};

use trimail_api::{BulkOutcome, MailboxApi, SuggestionAction, SuggestionStatus};

use crate::cache::{CacheStore, MailboxSnapshot, is_fresh};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::time::{Clock, SystemClock};

/// Options for [`MailboxSession::refresh`].
#[derive(Debug, Clone, Default)]
pub struct RefreshOptions {
    /// Bypass the staleness policy and refetch unconditionally.
    ///
    /// Does not bypass the upstream sync throttle.
    pub force_refresh: bool,
    /// Search query. Defaults to the session's configured query.
    pub query: Option<String>,
    /// Page size. Defaults to the session's configured page size.
    pub max_results: Option<u32>,
}

impl RefreshOptions {
    /// Options that bypass the staleness policy.
    #[must_use]
    pub fn forced() -> Self {
        Self {
            force_refresh: true,
            ..Self::default()
        }
    }

    /// Options targeting a specific search query.
    #[must_use]
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }
}

/// Clears an in-flight flag on drop, whatever the exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Coordinates the cache, the staleness policy, the sync gate and the
/// fetch orchestrator over a [`MailboxApi`] backend.
pub struct MailboxSession<A, C = SystemClock> {
    api: A,
    clock: C,
    config: SessionConfig,
    store: Mutex<CacheStore>,
    loading: AtomicBool,
    loading_more: AtomicBool,
}

impl<A: MailboxApi> MailboxSession<A> {
    /// Creates a session over the given backend with an empty cache.
    #[must_use]
    pub fn new(api: A, config: SessionConfig) -> Self {
        Self::with_clock(api, config, SystemClock)
    }
}

impl<A: MailboxApi, C: Clock> MailboxSession<A, C> {
    /// Creates a session with an explicit clock. Used by tests to control
    /// staleness deterministically.
    #[must_use]
    pub fn with_clock(api: A, config: SessionConfig, clock: C) -> Self {
        Self {
            api,
            clock,
            config,
            store: Mutex::new(CacheStore::new()),
            loading: AtomicBool::new(false),
            loading_more: AtomicBool::new(false),
        }
    }

    /// Returns the backend client this session talks to.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    fn store(&self) -> MutexGuard<'_, CacheStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, store: &CacheStore) -> MailboxSnapshot {
        let mut snapshot = store.snapshot();
        snapshot.loading = self.loading.load(Ordering::Acquire);
        snapshot.loading_more = self.loading_more.load(Ordering::Acquire);
        snapshot
    }

    /// Returns the current cached view without touching the network.
    #[must_use]
    pub fn snapshot(&self) -> MailboxSnapshot {
        self.publish(&self.store())
    }

    /// Refreshes the mailbox view, honoring the staleness policy.
    ///
    /// Serves the cache unchanged when it is fresh and populated (unless
    /// forced). Otherwise: the sync gate conditionally pulls new upstream
    /// data, the statistics are refetched through their own gate, and the
    /// three datasets are fetched concurrently with independent failure
    /// domains. A failed dataset keeps its previous cached value; only a
    /// failed message fetch surfaces as `error` on the snapshot.
    pub async fn refresh(&self, options: RefreshOptions) -> MailboxSnapshot {
        let query = options
            .query
            .unwrap_or_else(|| self.config.default_query.clone());
        let max_results = options.max_results.unwrap_or(self.config.default_max_results);
        let ttl = self.config.ttl;
        let now = self.clock.now();

        {
            let store = self.store();
            if !options.force_refresh
                && is_fresh(store.last_fetch, now, ttl)
                && !store.messages.is_empty()
            {
                debug!("cache fresh; serving without network");
                return self.publish(&store);
            }
        }

        debug!(query, force = options.force_refresh, "refreshing mailbox view");
        self.loading.store(true, Ordering::Release);
        self.store().error = None;

        self.maybe_sync(now).await;
        self.maybe_refresh_stats(now, options.force_refresh).await;

        // A new query or a forced refresh restarts pagination from the top.
        {
            let mut store = self.store();
            if options.force_refresh || store.active_query.as_deref() != Some(query.as_str()) {
                store.reset_pagination();
            }
        }

        // Fan out the three dataset fetches; each settles independently and
        // a failure in one never cancels the others.
        let (messages, senders, suggestions) = tokio::join!(
            self.api.list_messages(&query, max_results, None),
            self.api.list_senders(),
            self.api.list_suggestions(SuggestionStatus::Pending),
        );

        {
            // Stamp the fetch at completion, not at entry: the window the
            // staleness policy grants must not be shortened by however
            // long the sync and fetches took.
            let fetched_at = self.clock.now();
            let mut store = self.store();
            match messages {
                Ok(list) => {
                    store.replace_messages(list.into_page(), &query);
                    store.last_fetch = Some(fetched_at);
                }
                Err(e) => {
                    warn!(error = %e, "message fetch failed; keeping previous list");
                    store.error = Some(format!("Failed to load messages: {e}"));
                }
            }
            match senders {
                Ok(senders) => store.senders = senders,
                Err(e) => warn!(error = %e, "sender fetch failed; keeping previous list"),
            }
            match suggestions {
                Ok(suggestions) => store.suggestions = suggestions,
                Err(e) => warn!(error = %e, "suggestion fetch failed; keeping previous list"),
            }
        }

        self.loading.store(false, Ordering::Release);
        self.snapshot()
    }

    /// Sync gate: at most one upstream pull per staleness window.
    ///
    /// Returns whether a pull was performed. A failed pull leaves
    /// `last_sync` unset so the next stale read retries; it never blocks
    /// the read path.
    async fn maybe_sync(&self, now: Instant) -> bool {
        if is_fresh(self.store().last_sync, now, self.config.ttl) {
            return false;
        }
        match self.api.sync_mailbox().await {
            Ok(()) => {
                self.store().last_sync = Some(now);
                true
            }
            Err(e) => {
                warn!(error = %e, "upstream sync failed; serving existing data");
                false
            }
        }
    }

    /// Stats gate: refetch the statistics snapshot when stale or forced.
    ///
    /// A failure keeps the prior snapshot; stats are replaced wholesale,
    /// never merged field-by-field.
    async fn maybe_refresh_stats(&self, now: Instant, force: bool) {
        if !force && is_fresh(self.store().last_stats, now, self.config.ttl) {
            return;
        }
        match self.api.get_stats().await {
            Ok(stats) => {
                let mut store = self.store();
                store.stats = Some(stats);
                store.last_stats = Some(now);
            }
            Err(e) => warn!(error = %e, "stats fetch failed; keeping previous values"),
        }
    }

    /// Loads the next page of the message list, if one exists.
    ///
    /// No-op when the cursor is exhausted or another page load is already
    /// in flight; concurrent calls collapse to one request. On success the
    /// page is appended (deduplicated by message id) and the cursor is
    /// replaced; on failure both are left untouched so a retry can resume.
    pub async fn load_more(&self, query: Option<&str>) {
        if self
            .loading_more
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("page load already in flight");
            return;
        }
        let _in_flight = InFlightGuard(&self.loading_more);

        let Some(token) = self.store().pagination.next_page_token.clone() else {
            debug!("no continuation token; message list is complete");
            return;
        };

        let query = query.unwrap_or(self.config.default_query.as_str());
        match self
            .api
            .list_messages(query, self.config.default_max_results, Some(&token))
            .await
        {
            Ok(list) => {
                let page = list.into_page();
                debug!(count = page.messages.len(), "appending message page");
                self.store().append_messages(page);
            }
            Err(e) => warn!(error = %e, "page load failed; cursor retained for retry"),
        }
    }

    /// Refetches only the pending suggestions, leaving everything else
    /// untouched. A failure keeps the previous set.
    pub async fn refresh_suggestions(&self) {
        match self.api.list_suggestions(SuggestionStatus::Pending).await {
            Ok(suggestions) => self.store().suggestions = suggestions,
            Err(e) => warn!(error = %e, "suggestion refresh failed; keeping previous list"),
        }
    }

    /// Executes a suggestion on the backend, then removes it from the
    /// cache. The cache is only touched once the backend has accepted the
    /// action.
    ///
    /// # Errors
    ///
    /// Returns the API error; the cache is left unchanged and the error is
    /// also surfaced on the snapshot.
    pub async fn apply_suggestion(&self, id: &str) -> Result<()> {
        match self.api.apply_suggestion(id).await {
            Ok(()) => {
                self.store().remove_suggestion(id);
                Ok(())
            }
            Err(e) => {
                self.store().error = Some(format!("Failed to apply suggestion: {e}"));
                Err(e.into())
            }
        }
    }

    /// Declines a suggestion on the backend, then removes it from the
    /// cache on confirmation.
    ///
    /// # Errors
    ///
    /// Returns the API error; the cache is left unchanged and the error is
    /// also surfaced on the snapshot.
    pub async fn reject_suggestion(&self, id: &str) -> Result<()> {
        match self.api.reject_suggestion(id).await {
            Ok(()) => {
                self.store().remove_suggestion(id);
                Ok(())
            }
            Err(e) => {
                self.store().error = Some(format!("Failed to reject suggestion: {e}"));
                Err(e.into())
            }
        }
    }

    /// Applies one action to every message from a sender.
    ///
    /// # Errors
    ///
    /// Returns the API error; the cache is left unchanged and the error is
    /// also surfaced on the snapshot.
    pub async fn apply_bulk_action(
        &self,
        sender_email: &str,
        action: SuggestionAction,
        label: Option<&str>,
    ) -> Result<BulkOutcome> {
        match self.api.apply_bulk_action(sender_email, action, label).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.store().error = Some(format!("Failed to apply bulk action: {e}"));
                Err(e.into())
            }
        }
    }

    /// Removes a suggestion from the local cache only.
    ///
    /// Called after a remote apply/reject the consumer already issued.
    pub fn remove_suggestion_locally(&self, id: &str) {
        self.store().remove_suggestion(id);
    }

    /// Clears the error string on the snapshot, if any.
    pub fn clear_error(&self) {
        self.store().error = None;
    }

    /// Empties every dataset and nulls every timestamp in one step.
    ///
    /// Called at logout; the next refresh starts from a cold cache.
    pub fn clear_cache(&self) {
        self.store().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_options_defaults() {
        let options = RefreshOptions::default();
        assert!(!options.force_refresh);
        assert!(options.query.is_none());
        assert!(options.max_results.is_none());

        assert!(RefreshOptions::forced().force_refresh);
        assert_eq!(
            RefreshOptions::with_query("from:bob").query.as_deref(),
            Some("from:bob")
        );
    }
}
