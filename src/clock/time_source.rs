//! # Time sources for the version clock.
//!
//! A [`TimeSource`] supplies the "now" reading that [`VersionClock::bump`](crate::VersionClock::bump)
//! advances to. The clock never trusts it to be monotonic: readings that are
//! behind (or equal to) the current version are bumped forward by the smallest
//! step instead.

use std::time::SystemTime;

use super::version::Version;

/// Supplier of wall-clock readings.
pub trait TimeSource: Send + Sync + 'static {
    /// Returns the current reading as a [`Version`].
    fn now(&self) -> Version;
}

/// [`TimeSource`] backed by [`SystemTime::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Version {
        Version::from_system_time(SystemTime::now())
    }
}

#[cfg(test)]
pub(crate) mod manual {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    /// Test time source that only moves when told to.
    #[derive(Debug, Default)]
    pub(crate) struct ManualTimeSource {
        nanos: AtomicU64,
    }

    impl ManualTimeSource {
        pub(crate) fn set(&self, nanos: u64) {
            self.nanos.store(nanos, Ordering::SeqCst);
        }
    }

    impl TimeSource for ManualTimeSource {
        fn now(&self) -> Version {
            Version::from_nanos(self.nanos.load(Ordering::SeqCst))
        }
    }
}
