//! Client-side cache of the mailbox view.
//!
//! Holds the last known good snapshot of the four datasets (messages,
//! senders, suggestions, statistics) together with the pagination cursor
//! and the staleness bookkeeping.

mod store;

pub use store::{CacheStore, MailboxSnapshot, PaginationState, is_fresh};
