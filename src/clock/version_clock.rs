//! # VersionClock: coalescing change notification.
//!
//! Owns a single monotonically increasing [`Version`] and wakes **every** parked
//! waiter whenever it is bumped.
//!
//! ## Architecture
//! ```text
//! producer ── bump() ──► RwLock<Version> (exclusive) ──► Notify::notify_waiters()
//!                                                               │
//!             ┌─────────────────────────┬───────────────────────┤
//!             ▼                         ▼                       ▼
//!        wait(since)               wait(since)             pend(since)
//!      enable → re-check         enable → re-check      helper task loop
//! ```
//!
//! ## Rules
//! - **Monotonic**: `bump()` moves to `max(now, current + 1ns)`, never backward.
//! - **Broadcast**: every bump releases all waiters parked at that moment.
//! - **Re-check on wake**: the wakeup carries no value; each waiter re-reads
//!   the version, so any number of bumps coalesce into one observed transition.
//! - **No lost wakeups**: a waiter registers with the `Notify` before it reads
//!   the version, so a bump landing between the read and the park still wakes it.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Notify;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::pending::PendingWait;
use super::time_source::{SystemTimeSource, TimeSource};
use super::version::Version;
use super::waiter::Waiter;

struct Inner {
    version: RwLock<Version>,
    changed: Notify,
    time: Arc<dyn TimeSource>,
}

/// Shared, cheaply clonable version clock.
///
/// All clones observe and bump the same version.
#[derive(Clone)]
pub struct VersionClock {
    inner: Arc<Inner>,
}

impl VersionClock {
    /// Creates a clock at [`Version::ZERO`] driven by the system wall clock.
    pub fn new() -> Self {
        Self::with_time_source(Arc::new(SystemTimeSource))
    }

    /// Creates a clock at [`Version::ZERO`] driven by a custom time source.
    pub fn with_time_source(time: Arc<dyn TimeSource>) -> Self {
        Self {
            inner: Arc::new(Inner {
                version: RwLock::new(Version::ZERO),
                changed: Notify::new(),
                time,
            }),
        }
    }

    /// Returns the current version.
    pub fn at(&self) -> Version {
        *self.inner.version.read()
    }

    /// Advances the version and wakes every parked waiter.
    ///
    /// The new version is the time source reading, or the smallest step past
    /// the current version if the reading is not ahead of it.
    ///
    /// Strict progress holds until `u64::MAX` nanoseconds (year 2554), where
    /// the version saturates.
    pub fn bump(&self) -> Version {
        let next = {
            let mut version = self.inner.version.write();
            let now = self.inner.time.now();
            let next = if now > *version { now } else { version.next() };
            *version = next;
            next
        };
        self.inner.changed.notify_waiters();
        trace!(version = %next, "clock bumped");
        next
    }

    /// Waits until the version is past `since`, or until `cancel` fires.
    ///
    /// Returns the new version, or `since` unchanged if cancelled first. A
    /// clock that is already past `since` wins over an already cancelled token.
    pub async fn wait(&self, since: Version, cancel: Option<&CancellationToken>) -> Version {
        match cancel {
            None => self.changed_since(since).await,
            Some(token) => {
                tokio::select! {
                    biased;
                    v = self.changed_since(since) => v,
                    _ = token.cancelled() => since,
                }
            }
        }
    }

    /// Arms a wait for the next version after `since` without blocking.
    ///
    /// The wait runs on a helper task spawned on the current Tokio runtime.
    /// See [`PendingWait`] for delivery and cancellation rules.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn pend(&self, since: Version) -> PendingWait {
        let (tx, rx) = oneshot::channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let clock = self.clone();

        let helper = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(since = %since, "pending wait cancelled");
                }
                v = clock.changed_since(since) => {
                    // receiver gone means the token was dropped; nothing to deliver to
                    let _ = tx.send(v);
                }
            }
        });

        PendingWait::new(since, rx, cancel, helper)
    }

    /// Returns a cursor starting at [`Version::ZERO`].
    pub fn waiter(&self) -> Waiter {
        Waiter::new(self.clone())
    }

    /// Returns a cursor starting at `at`.
    pub fn waiter_at(&self, at: Version) -> Waiter {
        Waiter::starting_at(self.clone(), at)
    }

    /// Number of live handles on the shared state (clones, cursors, helpers).
    #[cfg(test)]
    pub(crate) fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Parks until the version is strictly greater than `since`.
    pub(crate) async fn changed_since(&self, since: Version) -> Version {
        loop {
            let notified = self.inner.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let at = self.at();
            if since < at {
                return at;
            }
            notified.await;
            trace!(since = %since, "woken, re-checking version");
        }
    }
}

impl Default for VersionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VersionClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionClock")
            .field("version", &self.at())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::time_source::manual::ManualTimeSource;
    use std::time::Duration;

    fn manual_clock() -> (VersionClock, Arc<ManualTimeSource>) {
        let time = Arc::new(ManualTimeSource::default());
        (VersionClock::with_time_source(time.clone()), time)
    }

    #[test]
    fn test_starts_at_zero() {
        let clock = VersionClock::new();
        assert_eq!(clock.at(), Version::ZERO);
    }

    #[test]
    fn test_bump_is_strictly_monotonic_back_to_back() {
        let clock = VersionClock::new();
        let mut prev = clock.at();
        for _ in 0..10_000 {
            let v = clock.bump();
            assert!(v > prev, "{v} not after {prev}");
            prev = v;
        }
        assert_eq!(clock.at(), prev);
    }

    #[test]
    fn test_bump_follows_time_source_when_ahead() {
        let (clock, time) = manual_clock();
        time.set(1_000);
        assert_eq!(clock.bump(), Version::from_nanos(1_000));
        time.set(5_000);
        assert_eq!(clock.bump(), Version::from_nanos(5_000));
    }

    #[test]
    fn test_bump_forces_progress_when_time_goes_backward() {
        let (clock, time) = manual_clock();
        time.set(1_000);
        assert_eq!(clock.bump(), Version::from_nanos(1_000));

        time.set(10);
        assert_eq!(clock.bump(), Version::from_nanos(1_001));

        // frozen clock
        assert_eq!(clock.bump(), Version::from_nanos(1_002));
    }

    #[test]
    fn test_bump_saturates_at_max_version() {
        let (clock, time) = manual_clock();
        time.set(u64::MAX);
        assert_eq!(clock.bump(), Version::from_nanos(u64::MAX));
        assert_eq!(clock.bump(), Version::from_nanos(u64::MAX));
    }

    #[test]
    fn test_clones_share_state() {
        let clock = VersionClock::new();
        let other = clock.clone();
        let v = other.bump();
        assert_eq!(clock.at(), v);
    }

    #[tokio::test]
    async fn test_wait_returns_immediately_when_behind() {
        let clock = VersionClock::new();
        let v = clock.bump();
        assert_eq!(clock.wait(Version::ZERO, None).await, v);
    }

    #[tokio::test]
    async fn test_wait_coalesces_bumps() {
        let clock = VersionClock::new();
        let since = clock.bump();

        let waiting = {
            let clock = clock.clone();
            tokio::spawn(async move { clock.wait(since, None).await })
        };
        tokio::task::yield_now().await;

        let mut last = since;
        for _ in 0..5 {
            last = clock.bump();
        }

        let seen = waiting.await.unwrap();
        assert_eq!(seen, last);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_parked_waiter_is_released() {
        let clock = VersionClock::new();
        let since = clock.bump();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let clock = clock.clone();
            handles.push(tokio::spawn(async move { clock.wait(since, None).await }));
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        let v = clock.bump();
        for h in handles {
            let seen = tokio::time::timeout(Duration::from_secs(5), h)
                .await
                .expect("waiter not released")
                .unwrap();
            assert!(seen >= v);
        }
    }

    #[tokio::test]
    async fn test_wait_cancelled_returns_since() {
        let clock = VersionClock::new();
        let since = clock.bump();
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(clock.wait(since, Some(&token)).await, since);
        assert_eq!(clock.at(), since);
    }

    #[tokio::test]
    async fn test_wait_prefers_update_over_cancel() {
        let clock = VersionClock::new();
        let v = clock.bump();
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(clock.wait(Version::ZERO, Some(&token)).await, v);
    }

    #[tokio::test]
    async fn test_wait_cancel_unblocks_parked_waiter() {
        let clock = VersionClock::new();
        let since = clock.bump();
        let token = CancellationToken::new();

        let waiting = {
            let clock = clock.clone();
            let token = token.clone();
            tokio::spawn(async move { clock.wait(since, Some(&token)).await })
        };
        tokio::task::yield_now().await;
        token.cancel();

        assert_eq!(waiting.await.unwrap(), since);
    }
}
