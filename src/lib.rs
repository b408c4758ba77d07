//! # incsignal
//!
//! **incsignal** provides two small primitives for telling many independent
//! consumers that shared state has changed, without polling and without letting
//! slow or idle consumers stall the producer.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   producer                                    producer
//!      │ bump()                                    │ update(value)
//!      ▼                                           ▼
//! ┌──────────────────────────┐      ┌──────────────────────────────────┐
//! │ VersionClock             │      │ BroadcastSource<T>               │
//! │ - RwLock<Version>        │      │ - Mutex<Vec<bounded sender>>     │
//! │ - Notify (wake all)      │      │ - try_send, evict on full        │
//! └────┬──────────┬──────────┘      └────┬──────────────┬──────────────┘
//!      ▼          ▼                      ▼              ▼
//!   Waiter     PendingWait             Feed           Feed
//!  (cursor)  (helper task)          (own pace)   (evicted → ends)
//! ```
//!
//! ### Version clock
//! ```text
//! Waiter::wait()
//!   loop {
//!     ├─► register with Notify
//!     ├─► read version
//!     ├─► version > cursor ─► adopt, return
//!     └─► park until next bump, then re-check
//!   }
//! ```
//! Any number of bumps that land while a consumer is busy collapse into one
//! observed transition carrying the latest version.
//!
//! ## Features
//! | Area              | Description                                                   | Key types                              |
//! |-------------------|---------------------------------------------------------------|----------------------------------------|
//! | **Versions**      | Monotonic, timestamp-like markers that never go backward.     | [`Version`], [`TimeSource`]            |
//! | **Waiting**       | Block until newer, with timeout or cancellation.              | [`VersionClock`], [`Waiter`]           |
//! | **Select-style**  | Arm a wait now, await or cancel it later without leaks.       | [`PendingWait`]                        |
//! | **Fan-out**       | Per-subscriber bounded feeds with slow-consumer eviction.     | [`BroadcastSource`], [`Feed`]          |
//! | **Configuration** | Queue capacity for broadcast sources.                         | [`SourceConfig`]                       |
//! | **Errors**        | Typed error for updates on a closed source.                   | [`SourceError`]                        |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use incsignal::{BroadcastSource, VersionClock};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let clock = VersionClock::new();
//!     let mut watcher = clock.waiter();
//!
//!     let consumer = tokio::spawn(async move {
//!         // wakes once, whatever number of bumps happened meanwhile
//!         watcher.wait_timeout(Duration::from_secs(1)).await
//!     });
//!     clock.bump();
//!     let latest = clock.bump();
//!     assert_eq!(consumer.await.unwrap(), latest);
//!
//!     let source = BroadcastSource::new();
//!     let (_, mut feed) = source.subscribe();
//!     source.update("hello").unwrap();
//!     assert_eq!(feed.recv().await.as_deref(), Some(&"hello"));
//! }
//! ```
mod clock;
mod error;
mod source;

// ---- Public re-exports ----

pub use clock::{PendingWait, SystemTimeSource, TimeSource, Version, VersionClock, Waiter};
pub use error::SourceError;
pub use source::{BroadcastSource, Feed, SourceConfig};
