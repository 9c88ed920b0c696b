//! # trimail-api
//!
//! Typed client for the trimail triage backend's REST API.
//!
//! This crate provides:
//! - Wire types for messages, senders, suggestions and mailbox statistics
//! - The [`MailboxApi`] trait describing the remote surface
//! - [`HttpMailboxClient`], a `reqwest`-based implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod types;

pub use client::{HttpMailboxClient, MailboxApi};
pub use error::{Error, Result};
pub use types::{
    BulkOutcome, MailboxStats, MessageList, MessagePage, MessageSummary, Sender, SenderPreference,
    Suggestion, SuggestionAction, SuggestionStatus,
};
