//! In-memory cache of the four mailbox datasets.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use trimail_api::{MailboxStats, MessagePage, MessageSummary, Sender, Suggestion};

/// Pagination cursor state for the message list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Opaque continuation token. `None` means no more pages.
    pub next_page_token: Option<String>,
    /// Approximate total number of matching messages.
    pub result_size_estimate: u64,
}

/// Read-only view of the cache published to consumers.
#[derive(Debug, Clone, Default)]
pub struct MailboxSnapshot {
    /// Cached message list, in arrival order.
    pub messages: Vec<MessageSummary>,
    /// Cached sender aggregates.
    pub senders: Vec<Sender>,
    /// Cached pending suggestions.
    pub suggestions: Vec<Suggestion>,
    /// Last known mailbox statistics, if ever fetched.
    pub stats: Option<MailboxStats>,
    /// Pagination cursor for the message list.
    pub pagination: PaginationState,
    /// Whether a full refresh is in flight.
    pub loading: bool,
    /// Whether an incremental page load is in flight.
    pub loading_more: bool,
    /// User-visible error from the last operation, if any.
    pub error: Option<String>,
}

/// Returns true iff `timestamp` is set and younger than `ttl`.
///
/// A dataset that has never been fetched (`None`) is always stale.
#[must_use]
pub fn is_fresh(timestamp: Option<Instant>, now: Instant, ttl: Duration) -> bool {
    timestamp.is_some_and(|ts| now.saturating_duration_since(ts) < ttl)
}

/// Last known good snapshot of the four datasets, plus the bookkeeping the
/// staleness policy and pagination cursor need.
///
/// Timestamps live here as plain fields, outside the published
/// [`MailboxSnapshot`], so updating them never looks like a data change to
/// consumers.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Message list, in arrival order, unique by `message_id`.
    pub messages: Vec<MessageSummary>,
    /// Sender aggregates.
    pub senders: Vec<Sender>,
    /// Pending suggestions.
    pub suggestions: Vec<Suggestion>,
    /// Mailbox statistics. Replaced wholesale, never merged field-by-field.
    pub stats: Option<MailboxStats>,
    /// Pagination cursor for `messages`.
    pub pagination: PaginationState,
    /// Query the cached message list was fetched with.
    pub active_query: Option<String>,
    /// User-visible error from the last operation.
    pub error: Option<String>,
    /// When the datasets were last fetched successfully.
    pub last_fetch: Option<Instant>,
    /// When the upstream sync last succeeded.
    pub last_sync: Option<Instant>,
    /// When the statistics were last fetched successfully.
    pub last_stats: Option<Instant>,
}

impl CacheStore {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the message list and cursor with a freshly fetched page.
    pub fn replace_messages(&mut self, page: MessagePage, query: &str) {
        self.messages = page.messages;
        self.pagination = PaginationState {
            next_page_token: page.next_page_token,
            result_size_estimate: page.result_size_estimate,
        };
        self.active_query = Some(query.to_string());
    }

    /// Appends a page to the message list, skipping already-cached ids.
    ///
    /// The upstream query window can shift between pages, so a page may
    /// repeat a message the cache already holds. Arrival order of new
    /// messages is preserved; nothing is re-sorted.
    pub fn append_messages(&mut self, page: MessagePage) {
        let mut seen: HashSet<String> = self
            .messages
            .iter()
            .map(|m| m.message_id.clone())
            .collect();
        for message in page.messages {
            if seen.insert(message.message_id.clone()) {
                self.messages.push(message);
            }
        }
        self.pagination = PaginationState {
            next_page_token: page.next_page_token,
            result_size_estimate: page.result_size_estimate,
        };
    }

    /// Resets the pagination cursor to its initial state.
    pub fn reset_pagination(&mut self) {
        self.pagination = PaginationState::default();
    }

    /// Removes the suggestion with the given id, if present.
    ///
    /// The underlying message is never touched.
    pub fn remove_suggestion(&mut self, id: &str) {
        self.suggestions.retain(|s| s.id != id);
    }

    /// Resets every dataset and every timestamp to its empty state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Clones the current datasets into a consumer-facing snapshot.
    ///
    /// The in-flight flags are owned by the session and filled in there.
    #[must_use]
    pub fn snapshot(&self) -> MailboxSnapshot {
        MailboxSnapshot {
            messages: self.messages.clone(),
            senders: self.senders.clone(),
            suggestions: self.suggestions.clone(),
            stats: self.stats,
            pagination: self.pagination.clone(),
            loading: false,
            loading_more: false,
            error: self.error.clone(),
        }
    }
}
