//! # Broadcast source configuration.
//!
//! Provides [`SourceConfig`], the settings for a [`BroadcastSource`](crate::BroadcastSource).
//!
//! ## Sentinel values
//! - `capacity = 0` → clamped to 1 (a queue must hold at least one update)

/// Settings for a [`BroadcastSource`](crate::BroadcastSource).
///
/// ## Field semantics
/// - `capacity`: per-subscriber queue size. A subscriber that falls this many
///   updates behind is evicted on the next update.
#[derive(Clone, Debug)]
pub struct SourceConfig {
    /// Capacity of each subscriber's queue.
    ///
    /// Shared by all subscribers of one source; not a global ring like
    /// `tokio::sync::broadcast`. Minimum value is 1 (see [`capacity_clamped`](Self::capacity_clamped)).
    pub capacity: usize,
}

impl SourceConfig {
    /// Default per-subscriber queue capacity.
    pub const DEFAULT_CAPACITY: usize = 5;

    /// Returns the queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn capacity_clamped(&self) -> usize {
        self.capacity.max(1)
    }
}

impl Default for SourceConfig {
    /// Default configuration:
    ///
    /// - `capacity = 5` (small: slow subscribers are dropped quickly)
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
        }
    }
}
