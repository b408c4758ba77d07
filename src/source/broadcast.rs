//! # Non-blocking update fan-out with slow-subscriber eviction.
//!
//! Provides [`BroadcastSource`]: distributes every update to all current
//! subscribers without ever blocking the producer.
//!
//! ## Architecture
//! ```text
//! update(value)
//!     │ (one lock for the whole fan-out)
//!     ├──► [queue 1] ──► Feed 1 ──► subscriber 1 (own pace)
//!     │    (bounded)
//!     ├──► [queue 2] ──► Feed 2 ──► subscriber 2
//!     │    (full)  ──► evicted: sender dropped, feed drains then ends
//!     └──► [queue N] ──► Feed N ──► subscriber N
//! ```
//!
//! ## Rules
//! - **Non-blocking**: `update()` uses `try_send` only.
//! - **Evict on overflow**: a full queue means the subscriber cannot keep up;
//!   it is closed once and removed before `update()` returns.
//! - **No replay**: new subscribers see only updates published after they subscribe.
//! - **Per-subscriber FIFO**: each feed sees updates in publish order.
//! - **No cross-subscriber ordering**: feed A may be at update N while B is at N+3.
//!
//! ## Example
//! ```rust
//! use incsignal::BroadcastSource;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let source = BroadcastSource::new();
//! let (initial, mut feed) = source.subscribe();
//! assert!(initial.is_none());
//!
//! source.update(1).unwrap();
//! assert_eq!(feed.recv().await.as_deref(), Some(&1));
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::config::SourceConfig;
use super::feed::Feed;
use crate::error::SourceError;

/// Producer side of one subscription.
struct SubscriberChannel<T> {
    id: u64,
    sender: mpsc::Sender<Arc<T>>,
}

struct State<T> {
    channels: Vec<SubscriberChannel<T>>,
    next_id: u64,
    closed: bool,
}

/// Multi-subscriber fan-out of update values.
///
/// Values are wrapped in an `Arc` once per update and shared by every feed.
pub struct BroadcastSource<T> {
    capacity: usize,
    state: Mutex<State<T>>,
}

impl<T: Send + Sync + 'static> BroadcastSource<T> {
    /// Creates a source with [`SourceConfig::default`].
    pub fn new() -> Self {
        Self::with_config(SourceConfig::default())
    }

    /// Creates a source with the given configuration.
    pub fn with_config(cfg: SourceConfig) -> Self {
        Self {
            capacity: cfg.capacity_clamped(),
            state: Mutex::new(State {
                channels: Vec::new(),
                next_id: 0,
                closed: false,
            }),
        }
    }

    /// Registers a new subscriber.
    ///
    /// Returns the initial state, which is always `None` (history is never
    /// replayed), and the subscriber's feed. After [`close`](Self::close) the
    /// returned feed has already ended.
    pub fn subscribe(&self) -> (Option<Arc<T>>, Feed<T>) {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;

        let (tx, rx) = mpsc::channel(self.capacity);
        if state.closed {
            drop(tx);
        } else {
            state.channels.push(SubscriberChannel { id, sender: tx });
        }
        debug!(subscriber = id, capacity = self.capacity, "subscribed");
        (None, Feed::new(id, rx))
    }

    /// Publishes `value` to every current subscriber.
    ///
    /// Subscribers whose queue is full are evicted; subscribers whose feed was
    /// dropped are forgotten. Returns `Ok(true)` while the source is open.
    pub fn update(&self, value: T) -> Result<bool, SourceError> {
        self.update_arc(Arc::new(value))
    }

    /// Publishes a pre-allocated `Arc<T>` to every current subscriber.
    ///
    /// # Errors
    /// [`SourceError::Closed`] after [`close`](Self::close).
    pub fn update_arc(&self, value: Arc<T>) -> Result<bool, SourceError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SourceError::Closed);
        }

        let capacity = self.capacity;
        state
            .channels
            .retain(|channel| match channel.sender.try_send(Arc::clone(&value)) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(
                        subscriber = channel.id,
                        capacity, "subscriber cannot keep up, evicting"
                    );
                    false
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(subscriber = channel.id, "feed dropped, removing subscriber");
                    false
                }
            });
        Ok(true)
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().channels.len()
    }

    /// Ends every feed and rejects further updates. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        let ended = std::mem::take(&mut state.channels).len();
        debug!(subscribers = ended, "source closed");
    }

    /// Returns `true` after [`close`](Self::close).
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Per-subscriber queue capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Send + Sync + 'static> Default for BroadcastSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BroadcastSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BroadcastSource")
            .field("capacity", &self.capacity)
            .field("subscribers", &state.channels.len())
            .field("closed", &state.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_subscriber_receives_update() {
        let source = BroadcastSource::new();
        let (initial, mut feed) = source.subscribe();
        assert!(initial.is_none());

        assert_eq!(source.update(1), Ok(true));
        assert_eq!(feed.recv().await.as_deref(), Some(&1));
    }

    #[tokio::test]
    async fn test_update_without_subscribers_succeeds() {
        let source = BroadcastSource::<u32>::new();
        assert_eq!(source.update(7), Ok(true));
        assert_eq!(source.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_no_replay_for_late_subscriber() {
        let source = BroadcastSource::new();
        source.update("before").unwrap();

        let (initial, mut feed) = source.subscribe();
        assert!(initial.is_none());
        assert!(feed.try_recv().is_none());

        source.update("after").unwrap();
        assert_eq!(feed.recv().await.as_deref(), Some(&"after"));
    }

    #[tokio::test]
    async fn test_slow_subscriber_is_evicted() {
        let source = BroadcastSource::new();
        let (_, mut slow) = source.subscribe();
        let (_, mut fast) = source.subscribe();
        let capacity = source.capacity();

        for i in 0..=capacity {
            source.update(i).unwrap();
            assert_eq!(fast.recv().await.as_deref(), Some(&i));
        }

        assert_eq!(source.subscriber_count(), 1);
        assert!(slow.is_closed());

        // buffered values drain, then the feed ends
        let drained: Vec<usize> = (&mut slow).map(|v| *v).collect().await;
        assert_eq!(drained, (0..capacity).collect::<Vec<_>>());
        assert!(slow.recv().await.is_none());

        // the evicted feed never sees later updates
        source.update(99).unwrap();
        assert!(slow.try_recv().is_none());
        assert_eq!(fast.recv().await.as_deref(), Some(&99));
    }

    #[tokio::test]
    async fn test_subscriber_at_capacity_is_kept() {
        let source = BroadcastSource::with_config(SourceConfig { capacity: 3 });
        let (_, feed) = source.subscribe();
        for i in 0..3 {
            source.update(i).unwrap();
        }
        assert_eq!(source.subscriber_count(), 1);
        assert_eq!(feed.len(), 3);
        assert!(!feed.is_closed());
    }

    #[tokio::test]
    async fn test_keeping_up_never_loses_updates() {
        let source = BroadcastSource::with_config(SourceConfig { capacity: 1 });
        let (_, mut feed) = source.subscribe();

        for i in 0..200u32 {
            source.update(i).unwrap();
            assert_eq!(feed.recv().await.as_deref(), Some(&i));
        }
        assert_eq!(source.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_dropped_feed_is_forgotten() {
        let source = BroadcastSource::new();
        let (_, feed) = source.subscribe();
        let (_, _kept) = source.subscribe();
        assert_eq!(source.subscriber_count(), 2);

        drop(feed);
        source.update(()).unwrap();
        assert_eq!(source.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_close_ends_feeds_and_rejects_updates() {
        let source = BroadcastSource::new();
        let (_, mut feed) = source.subscribe();
        source.update(1).unwrap();

        source.close();
        source.close();
        assert!(source.is_closed());
        assert_eq!(source.update(2), Err(SourceError::Closed));

        assert_eq!(feed.recv().await.as_deref(), Some(&1));
        assert!(feed.recv().await.is_none());

        let (_, mut late) = source.subscribe();
        assert!(late.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_dropping_source_ends_feeds() {
        let source = BroadcastSource::<u8>::new();
        let (_, mut feed) = source.subscribe();
        drop(source);
        assert!(feed.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_subscription_ids_are_unique() {
        let source = BroadcastSource::<u8>::new();
        let (_, a) = source.subscribe();
        let (_, b) = source.subscribe();
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_reader_keeps_up() {
        let source = BroadcastSource::with_config(SourceConfig { capacity: 64 });
        let (_, feed) = source.subscribe();

        let reader = tokio::spawn(async move { feed.map(|v| *v).collect::<Vec<u32>>().await });

        for i in 0..32u32 {
            source.update(i).unwrap();
        }
        source.close();

        let got = reader.await.unwrap();
        assert_eq!(got, (0..32).collect::<Vec<_>>());
    }
}
