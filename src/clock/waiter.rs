//! # Waiter: a consumer's cursor over a [`VersionClock`].
//!
//! A `Waiter` remembers the last version it adopted and waits for anything
//! newer. Clone (or [`Waiter::fork`]) to get an independent cursor at the same
//! version; clones share nothing but the clock.
//!
//! Waiting takes `&mut self`, so one cursor can never have two waits in flight.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use incsignal::VersionClock;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let clock = VersionClock::new();
//! let mut waiter = clock.waiter();
//!
//! let v = clock.bump();
//! assert_eq!(waiter.wait().await, v);
//!
//! // nothing new: the timeout hands back the unchanged cursor
//! assert_eq!(waiter.wait_timeout(Duration::ZERO).await, v);
//! # }
//! ```

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::pending::PendingWait;
use super::version::Version;
use super::version_clock::VersionClock;

/// Per-consumer cursor over a shared [`VersionClock`].
#[derive(Clone, Debug)]
pub struct Waiter {
    clock: VersionClock,
    at: Version,
}

impl Waiter {
    /// Creates a cursor at [`Version::ZERO`].
    pub fn new(clock: VersionClock) -> Self {
        Self::starting_at(clock, Version::ZERO)
    }

    /// Creates a cursor at `at`.
    pub fn starting_at(clock: VersionClock, at: Version) -> Self {
        Self { clock, at }
    }

    /// The last version this cursor adopted.
    pub fn at(&self) -> Version {
        self.at
    }

    /// The clock this cursor follows.
    pub fn clock(&self) -> &VersionClock {
        &self.clock
    }

    /// Independent cursor at the same version.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Returns `true` if the clock has moved past this cursor.
    pub fn is_stale(&self) -> bool {
        self.at < self.clock.at()
    }

    /// Waits until the clock moves past this cursor, adopts and returns the new version.
    pub async fn wait(&mut self) -> Version {
        self.at = self.clock.wait(self.at, None).await;
        self.at
    }

    /// As [`wait`](Self::wait), but gives up after `timeout`.
    ///
    /// On timeout the cursor is unchanged and its current version is returned.
    /// A version that is already available is returned even for a zero timeout.
    pub async fn wait_timeout(&mut self, timeout: Duration) -> Version {
        if let Ok(v) = tokio::time::timeout(timeout, self.clock.wait(self.at, None)).await {
            self.at = v;
        }
        self.at
    }

    /// As [`wait`](Self::wait), but gives up once `cancel` fires.
    ///
    /// On cancellation the cursor is unchanged and its current version is returned.
    pub async fn wait_or_cancel(&mut self, cancel: &CancellationToken) -> Version {
        self.at = self.clock.wait(self.at, Some(cancel)).await;
        self.at
    }

    /// Arms a wait from this cursor's version without adopting the result.
    ///
    /// Feed the delivered version back with [`adopt`](Self::adopt).
    pub fn pend(&self) -> PendingWait {
        self.clock.pend(self.at)
    }

    /// Moves the cursor to `v` if it is newer. Never moves backward.
    pub fn adopt(&mut self, v: Version) -> Version {
        if v > self.at {
            self.at = v;
        }
        self.at
    }
}
