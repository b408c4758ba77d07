//! Error types used by the broadcast source.
//!
//! The version clock has no failure modes: every outcome of a wait (new
//! version, cancelled, timed out) is expressed by the returned [`Version`](crate::Version).
//! Slow-subscriber eviction is not an error either; a subscriber learns about it
//! only by seeing its [`Feed`](crate::Feed) end.

use thiserror::Error;

/// # Errors produced by [`BroadcastSource::update`](crate::BroadcastSource::update).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The source was closed; no further updates are delivered.
    #[error("source closed")]
    Closed,
}

impl SourceError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use incsignal::SourceError;
    ///
    /// assert_eq!(SourceError::Closed.as_label(), "source_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SourceError::Closed => "source_closed",
        }
    }
}
