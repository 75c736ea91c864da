use std::fmt;
use std::time::Duration;

/// Seconds between the NTP prime epoch (1900-01-01) and the Unix epoch.
pub const NTP_UNIX_EPOCH_DELTA: i64 = 2_208_988_800;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// 64-bit NTP timestamp: 32-bit seconds since 1900-01-01 and a 32-bit binary fraction.
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Seconds                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Fraction                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NtpTimestamp(u64);

impl NtpTimestamp {
    pub fn new(seconds: u32, fraction: u32) -> NtpTimestamp {
        NtpTimestamp(((seconds as u64) << 32) | fraction as u64)
    }

    pub fn from_bits(bits: u64) -> NtpTimestamp {
        NtpTimestamp(bits)
    }

    pub fn to_bits(self) -> u64 {
        self.0
    }

    pub fn seconds(self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub fn fraction(self) -> u32 {
        self.0 as u32
    }

    /// NTP era of the timestamp.
    ///
    /// Seconds with the most significant bit clear belong to era 1, which starts
    /// on 2036-02-07T06:28:16Z; the others belong to era 0.
    pub fn era(self) -> u32 {
        if self.seconds() & 0x8000_0000 == 0 {
            1
        } else {
            0
        }
    }

    /// Nanoseconds since the Unix epoch.
    ///
    /// The fraction is converted as `(fraction * 10^9) >> 32`, truncating.
    pub fn to_unix_nanos(self) -> i64 {
        let secs = ((self.era() as i64) << 32) + self.seconds() as i64 - NTP_UNIX_EPOCH_DELTA;
        let nanos = ((self.fraction() as u64 * NANOS_PER_SEC as u64) >> 32) as i64;

        secs * NANOS_PER_SEC + nanos
    }

    /// Builds the NTP timestamp of a Unix instant.
    ///
    /// The fraction is rounded down, so `to_unix_nanos` may give back one nanosecond less.
    pub fn from_unix(since_epoch: Duration) -> NtpTimestamp {
        let seconds = (since_epoch.as_secs() as i64 + NTP_UNIX_EPOCH_DELTA) as u32;
        let fraction = ((since_epoch.subsec_nanos() as u64) << 32) / NANOS_PER_SEC as u64;

        NtpTimestamp::new(seconds, fraction as u32)
    }
}

impl fmt::Display for NtpTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:08x}", self.seconds(), self.fraction())
    }
}
