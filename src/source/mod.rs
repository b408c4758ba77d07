//! Broadcast source: fan-out of update values to independent subscribers.
//!
//! ## Contents
//! - [`BroadcastSource`] producer side; `subscribe` / `update` / `close`
//! - [`Feed`] subscriber side of one bounded queue (also a `futures::Stream`)
//! - [`SourceConfig`] per-subscriber queue capacity
//!
//! ## Defaults
//! - `SourceConfig::default()` → capacity 5.
//! - A subscriber more than `capacity` updates behind is evicted, not waited for.

mod broadcast;
mod config;
mod feed;

pub use broadcast::BroadcastSource;
pub use config::SourceConfig;
pub use feed::Feed;
