use std::fmt;
use std::time::Duration;

/// Signed clock correction, in nanoseconds, applied to every record of a capture.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ClockOffset(i64);

impl ClockOffset {
    pub const ZERO: ClockOffset = ClockOffset(0);

    pub fn from_nanos(nanos: i64) -> ClockOffset {
        ClockOffset(nanos)
    }

    pub fn as_nanos(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Magnitude of the offset.
    pub fn magnitude(self) -> Duration {
        Duration::from_nanos(self.0.unsigned_abs())
    }

    /// Shifts `timestamp` by the offset.
    ///
    /// Returns `None` if the result would fall before the Unix epoch.
    pub fn apply(self, timestamp: Duration) -> Option<Duration> {
        let shifted = timestamp.as_nanos() as i128 + self.0 as i128;
        if shifted < 0 {
            return None;
        }

        let secs = u64::try_from(shifted / 1_000_000_000).ok()?;
        Some(Duration::new(secs, (shifted % 1_000_000_000) as u32))
    }
}

impl fmt::Display for ClockOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        write!(f, "{}", humantime::format_duration(self.magnitude()))
    }
}
