//! # trimail-core
//!
//! Mailbox data-synchronization and cache-coordination core for the
//! trimail triage client.
//!
//! This crate provides:
//! - An in-memory **cache store** holding the last known good snapshot of
//!   messages, senders, suggestions and mailbox statistics
//! - A **staleness policy** (per-dataset TTL) deciding when a read needs a
//!   refresh
//! - A **fetch orchestrator** that fans out to the independent backend
//!   resources and merges partial successes without discarding good data
//! - A **sync gate** throttling the expensive upstream pull
//! - A **pagination cursor** for incremental message loading
//! - **Local mutators** for optimistic cache edits and teardown

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
mod error;
mod session;
pub mod time;

pub use cache::{CacheStore, MailboxSnapshot, PaginationState, is_fresh};
pub use config::{DEFAULT_MAX_RESULTS, DEFAULT_QUERY, DEFAULT_TTL, SessionConfig};
pub use error::{Error, Result};
pub use session::{MailboxSession, RefreshOptions};
