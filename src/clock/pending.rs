//! # PendingWait: an armed, cancellable wait.
//!
//! Returned by [`VersionClock::pend`](crate::VersionClock::pend). It lets a caller
//! fold a version wait into its own `tokio::select!` loop, or hold it across
//! other work and collect it later.
//!
//! ## Rules
//! - Exactly one outcome is committed per token: either the helper delivers
//!   the new version, or it acknowledges cancellation. Never both, never neither.
//! - [`PendingWait::cancel`] joins the helper task before returning. If the
//!   version was already committed, it is handed back instead of being lost.
//! - Dropping an unfinished token cancels its helper, so abandoned waits never
//!   leave a parked task behind.
//! - Polling again after completion yields `None`; the token is a
//!   [`FusedFuture`], so `select!` loops may keep it across iterations.
//!
//! ## Example
//! ```rust
//! use incsignal::VersionClock;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let clock = VersionClock::new();
//! let pending = clock.pend(clock.at());
//! let v = clock.bump();
//! assert_eq!(pending.await, Some(v));
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures::future::FusedFuture;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::warn;

use super::version::Version;

/// In-flight subscription to "the next version after `since`".
///
/// Resolves to `Some(version)` once the clock moves past `since`. Resolves to
/// `None` only if the helper task stopped without delivering (runtime shutdown).
#[must_use = "a pending wait does nothing unless awaited or cancelled"]
pub struct PendingWait {
    since: Version,
    result: oneshot::Receiver<Version>,
    guard: DropGuard,
    helper: JoinHandle<()>,
    /// Set once `poll` has returned `Ready`.
    done: bool,
}

impl PendingWait {
    pub(crate) fn new(
        since: Version,
        result: oneshot::Receiver<Version>,
        cancel: CancellationToken,
        helper: JoinHandle<()>,
    ) -> Self {
        Self {
            since,
            result,
            guard: cancel.drop_guard(),
            helper,
            done: false,
        }
    }

    /// The version this wait was armed against.
    pub fn since(&self) -> Version {
        self.since
    }

    /// Returns `true` once the helper task has finished (delivered or cancelled).
    pub fn is_finished(&self) -> bool {
        self.helper.is_finished()
    }

    /// Cancels the wait and joins its helper task.
    ///
    /// Returns `Some(version)` if the helper had already committed a version
    /// before the cancellation landed, `None` if the cancellation won. A value
    /// already taken by awaiting this token is never returned a second time.
    pub async fn cancel(self) -> Option<Version> {
        let PendingWait {
            since,
            mut result,
            guard,
            helper,
            ..
        } = self;

        guard.disarm().cancel();
        if let Err(err) = helper.await {
            warn!(since = %since, error = %err, "pending wait helper did not finish cleanly");
        }
        result.try_recv().ok()
    }
}

impl Future for PendingWait {
    type Output = Option<Version>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        let res = ready!(Pin::new(&mut this.result).poll(cx));
        this.done = true;
        Poll::Ready(res.ok())
    }
}

impl FusedFuture for PendingWait {
    fn is_terminated(&self) -> bool {
        self.done
    }
}

impl std::fmt::Debug for PendingWait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingWait")
            .field("since", &self.since)
            .field("finished", &self.is_finished())
            .finish()
    }
}
