//! Version clock: types and waiting protocol.
//!
//! ## Contents
//! - [`Version`] opaque monotonic marker
//! - [`VersionClock`] owner of the version; `at` / `bump` / `wait` / `pend`
//! - [`Waiter`] per-consumer cursor (`wait`, `wait_timeout`, `wait_or_cancel`)
//! - [`PendingWait`] armed, cancellable wait for select-style integration
//! - [`TimeSource`] pluggable "now" for the clock
//!
//! ## Quick wiring
//! ```text
//! producer ──► VersionClock::bump()
//!                    │ (wake all)
//!        ┌───────────┼───────────┐
//!        ▼           ▼           ▼
//!     Waiter      Waiter     PendingWait
//!   (cursor a)  (cursor b)  (helper task)
//! ```

mod pending;
mod time_source;
mod version;
mod version_clock;
mod waiter;

pub use pending::PendingWait;
pub use time_source::{SystemTimeSource, TimeSource};
pub use version::Version;
pub use version_clock::VersionClock;
pub use waiter::Waiter;
