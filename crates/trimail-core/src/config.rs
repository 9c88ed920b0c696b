//! Session configuration.

use std::time::Duration;

/// Staleness window applied to all cached datasets.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Query used when the caller does not supply one.
pub const DEFAULT_QUERY: &str = "in:inbox";

/// Page size used when the caller does not supply one.
pub const DEFAULT_MAX_RESULTS: u32 = 100;

/// Tuning knobs for a [`MailboxSession`](crate::MailboxSession).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum age before cached data must be refreshed.
    pub ttl: Duration,
    /// Default search query.
    pub default_query: String,
    /// Default page size for message listings.
    pub default_max_results: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            default_query: DEFAULT_QUERY.to_string(),
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SessionConfig {
    /// Creates a configuration with a custom staleness window.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }
}
