//! # Feed: the subscriber side of a broadcast queue.
//!
//! Each [`Feed`] owns one bounded queue of a [`BroadcastSource`](crate::BroadcastSource).
//! Reading happens outside any source lock, at the subscriber's own pace.
//!
//! ## Rules
//! - **FIFO**: updates arrive in the order they were published.
//! - **End of feed**: `recv()` returns `None` after the subscriber was evicted
//!   (once the values buffered before eviction are drained), or after the
//!   source was closed or dropped.
//! - **Drop to leave**: dropping a feed detaches it; the source forgets it on
//!   the next update.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

/// Receiving end of one subscription.
#[derive(Debug)]
pub struct Feed<T> {
    id: u64,
    rx: mpsc::Receiver<Arc<T>>,
}

impl<T> Feed<T> {
    pub(crate) fn new(id: u64, rx: mpsc::Receiver<Arc<T>>) -> Self {
        Self { id, rx }
    }

    /// Subscription id, unique within its source.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Receives the next update, or `None` once the feed has ended.
    pub async fn recv(&mut self) -> Option<Arc<T>> {
        self.rx.recv().await
    }

    /// Receives the next update if one is buffered.
    ///
    /// Returns `None` both when nothing is buffered and when the feed has ended;
    /// use [`is_closed`](Self::is_closed) to tell them apart.
    pub fn try_recv(&mut self) -> Option<Arc<T>> {
        self.rx.try_recv().ok()
    }

    /// Returns `true` once the producer side has let go of this feed.
    ///
    /// Buffered values may still be readable.
    pub fn is_closed(&self) -> bool {
        self.rx.is_closed()
    }

    /// Number of updates currently buffered.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Returns `true` if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl<T> Stream for Feed<T> {
    type Item = Arc<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
