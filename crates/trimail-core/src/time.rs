//! Time abstraction for testable staleness checks.
//!
//! Cache freshness is decided by comparing elapsed monotonic time against a
//! TTL. The [`Clock`] trait abstracts over "now" so those decisions can be
//! tested without sleeping: production code uses [`SystemClock`], tests use
//! [`MockClock`] and advance it manually.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Abstraction over time for testability.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// System clock that uses real time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A mock clock for testing time-dependent code.
///
/// Starts at a base instant and advances only when told to.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use trimail_core::time::{Clock, MockClock};
///
/// let clock = MockClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(300));
/// assert_eq!(clock.now() - start, Duration::from_secs(300));
/// ```
#[derive(Debug)]
pub struct MockClock {
    /// Base instant (when the clock was created).
    base: Instant,
    /// Offset from base in nanoseconds.
    offset_nanos: AtomicU64,
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClock {
    /// Creates a new mock clock starting at the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset_nanos: AtomicU64::new(0),
        }
    }

    /// Creates a mock clock that can be shared across tasks.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Advances the clock by the given duration.
    ///
    /// # Note
    /// Durations longer than ~584 years will be truncated. This is acceptable
    /// for a mock clock used in testing.
    #[allow(clippy::cast_possible_truncation)]
    pub fn advance(&self, duration: Duration) {
        let nanos = duration.as_nanos() as u64;
        self.offset_nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    /// Returns the current offset from the base time.
    #[must_use]
    pub fn offset(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.base + self.offset()
    }
}

impl Clock for Arc<MockClock> {
    fn now(&self) -> Instant {
        self.as_ref().now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock() {
        let clock = SystemClock;
        let before = Instant::now();
        let from_clock = clock.now();
        let after = Instant::now();

        assert!(from_clock >= before);
        assert!(from_clock <= after);
    }

    #[test]
    fn test_mock_clock_advance() {
        let clock = MockClock::new();
        let start = clock.now();

        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.now() - start, Duration::from_secs(10));

        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now() - start, Duration::from_secs(15));
    }

    #[test]
    fn test_shared_mock_clock() {
        let clock = MockClock::shared();
        let clock2 = Arc::clone(&clock);

        let start = clock.now();
        clock2.advance(Duration::from_secs(10));

        assert_eq!(clock.now() - start, Duration::from_secs(10));
    }
}
