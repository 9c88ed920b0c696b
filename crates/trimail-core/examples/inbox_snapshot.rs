#![allow(clippy::expect_used, clippy::uninlined_format_args)]
//! Example: Fetch and print an inbox snapshot from a running backend
//!
//! ## Running
//!
//! ```bash
//! TRIMAIL_API_URL=http://localhost:8080 TRIMAIL_USER=me@example.com \
//!     cargo run --package trimail-core --example inbox_snapshot
//! ```

use trimail_api::HttpMailboxClient;
use trimail_core::{MailboxSession, RefreshOptions, SessionConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let base_url =
        std::env::var("TRIMAIL_API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let user = std::env::var("TRIMAIL_USER").expect("TRIMAIL_USER must be set");

    let client = HttpMailboxClient::new(base_url, user);
    let session = MailboxSession::new(client, SessionConfig::default());

    let snapshot = session.refresh(RefreshOptions::default()).await;

    if let Some(error) = &snapshot.error {
        eprintln!("warning: {}", error);
    }
    if let Some(stats) = snapshot.stats {
        println!(
            "Mailbox: {} messages, {} in inbox, {} unread",
            stats.total_messages, stats.inbox_count, stats.unread_count
        );
    }
    println!(
        "{} messages cached ({} pending suggestions, {} senders)",
        snapshot.messages.len(),
        snapshot.suggestions.len(),
        snapshot.senders.len()
    );
    for message in snapshot.messages.iter().take(20) {
        let marker = if message.is_read { " " } else { "*" };
        println!("{} {}  {}", marker, message.from, message.subject);
    }
    if snapshot.pagination.next_page_token.is_some() {
        println!(
            "... more available (about {} total)",
            snapshot.pagination.result_size_estimate
        );
    }
}
