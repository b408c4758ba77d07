//! # Version marker.
//!
//! [`Version`] is an opaque, totally ordered marker of how recent the tracked
//! state is. Internally it is a wall-clock reading in nanoseconds since the Unix
//! epoch, but callers should only compare versions, never do arithmetic on them.
//!
//! ## Example
//! ```rust
//! use incsignal::Version;
//!
//! let v = Version::from_nanos(10);
//! assert!(Version::ZERO < v);
//! assert!(v < v.next());
//! ```

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Monotonic version marker handed out by a [`VersionClock`](crate::VersionClock).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u64);

impl Version {
    /// The minimum version. Fresh clocks and cursors start here.
    pub const ZERO: Version = Version(0);

    /// Builds a version from nanoseconds since the Unix epoch.
    #[inline]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Builds a version from a wall-clock reading.
    ///
    /// Readings before the Unix epoch map to [`Version::ZERO`]; readings past
    /// the representable range saturate.
    pub fn from_system_time(t: SystemTime) -> Self {
        match t.duration_since(UNIX_EPOCH) {
            Ok(d) => Self(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)),
            Err(_) => Self::ZERO,
        }
    }

    /// Nanoseconds since the Unix epoch.
    #[inline]
    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// The wall-clock instant this version corresponds to.
    pub fn as_system_time(self) -> SystemTime {
        UNIX_EPOCH + Duration::from_nanos(self.0)
    }

    /// Smallest version strictly greater than `self` (saturating).
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns `true` for [`Version::ZERO`].
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<SystemTime> for Version {
    fn from(t: SystemTime) -> Self {
        Self::from_system_time(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_minimum() {
        assert!(Version::ZERO.is_zero());
        assert_eq!(Version::default(), Version::ZERO);
        assert!(Version::ZERO < Version::from_nanos(1));
    }

    #[test]
    fn test_next_is_strictly_greater() {
        let v = Version::from_nanos(41);
        assert_eq!(v.next(), Version::from_nanos(42));
        assert_eq!(Version::from_nanos(u64::MAX).next(), Version::from_nanos(u64::MAX));
    }

    #[test]
    fn test_system_time_conversion() {
        let t = UNIX_EPOCH + Duration::from_secs(3);
        let v = Version::from(t);
        assert_eq!(v.as_nanos(), 3_000_000_000);
        assert_eq!(v.as_system_time(), t);

        let before_epoch = UNIX_EPOCH - Duration::from_secs(1);
        assert_eq!(Version::from_system_time(before_epoch), Version::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::from_nanos(7).to_string(), "v7");
    }
}
