//! NTP-style time tags with millisecond resolution.
//!
//! Wire layout (8 bytes, codec byte order):
//! ```text
//! ┌──────────────────────────┬──────────────────────────┐
//! │ Seconds since 1900 (u32) │ Milliseconds (u32)       │
//! └──────────────────────────┴──────────────────────────┘
//! ```
//!
//! The second word holds whole milliseconds, not the NTP 2^-32 fraction.
//! Peers that send a real NTP fraction will read back as a later moment.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::BytesMut;

use crate::byte_order::ByteOrder;
use crate::error::{CodecError, Result};
use crate::wire::ByteCursor;

/// Seconds between 1900-01-01T00:00:00 and the Unix epoch.
pub const NTP_UNIX_OFFSET_SECS: u64 = 2_208_988_800;

/// Size of a time tag on the wire.
pub const TIME_TAG_SIZE: usize = 8;

const MAX_MILLIS: u64 = (u32::MAX as u64 + 1) * 1000 - 1;

/// A moment in time, truncated to milliseconds, counted from 1900-01-01.
///
/// Ordering and equality follow the underlying moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeTag {
    millis: u64,
}

impl TimeTag {
    /// Earliest constructible time tag: one millisecond after the epoch.
    pub const MIN: TimeTag = TimeTag { millis: 1 };

    /// Build a time tag from milliseconds since 1900-01-01T00:00:00.
    ///
    /// Fails for the epoch itself and for moments past the 32-bit seconds range.
    pub fn from_millis(millis: u64) -> Result<Self> {
        if millis < Self::MIN.millis {
            return Err(CodecError::InvalidTimestamp(format!(
                "{millis} ms is not after 1900-01-01T00:00:00"
            )));
        }
        if millis > MAX_MILLIS {
            return Err(CodecError::InvalidTimestamp(format!(
                "{millis} ms exceeds the 32-bit seconds range"
            )));
        }
        Ok(Self { millis })
    }

    /// Build a time tag from a system time, dropping sub-millisecond precision.
    pub fn from_system_time(time: SystemTime) -> Result<Self> {
        let offset_ms = u128::from(NTP_UNIX_OFFSET_SECS) * 1000;
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(since_unix) => offset_ms + since_unix.as_millis(),
            Err(err) => {
                // Round toward the past, matching truncation after 1970.
                let before = err.duration();
                let back = before.as_millis() + u128::from(before.subsec_nanos() % 1_000_000 != 0);
                offset_ms.checked_sub(back).ok_or_else(|| {
                    CodecError::InvalidTimestamp("moment precedes 1900-01-01".to_string())
                })?
            }
        };
        let millis = u64::try_from(millis).map_err(|_| {
            CodecError::InvalidTimestamp("moment exceeds the 32-bit seconds range".to_string())
        })?;
        Self::from_millis(millis)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now()).unwrap_or(Self::MIN)
    }

    /// Milliseconds since 1900-01-01T00:00:00.
    pub fn as_millis(self) -> u64 {
        self.millis
    }

    /// Whole seconds since the epoch, as written to the first wire word.
    pub fn seconds(self) -> u32 {
        (self.millis / 1000) as u32
    }

    /// Millisecond remainder, as written to the second wire word.
    pub fn fraction(self) -> u32 {
        (self.millis % 1000) as u32
    }

    /// Convert back to a system time, if the platform can represent it.
    pub fn to_system_time(self) -> Option<SystemTime> {
        let offset_ms = NTP_UNIX_OFFSET_SECS * 1000;
        if self.millis >= offset_ms {
            UNIX_EPOCH.checked_add(Duration::from_millis(self.millis - offset_ms))
        } else {
            UNIX_EPOCH.checked_sub(Duration::from_millis(offset_ms - self.millis))
        }
    }

    pub(crate) fn encode_into(self, order: ByteOrder, dst: &mut BytesMut) {
        order.put_u32(dst, self.seconds());
        order.put_u32(dst, self.fraction());
    }

    /// Decoded tags skip the construction-time lower bound, so the epoch
    /// itself is accepted. Tags whose millisecond word carries them past the
    /// 32-bit seconds range are rejected, since they could not be re-encoded.
    pub(crate) fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let offset = cursor.position();
        let seconds = cursor.read_u32()?;
        let fraction = cursor.read_u32()?;
        let millis = u64::from(seconds) * 1000 + u64::from(fraction);
        if millis > MAX_MILLIS {
            return Err(CodecError::malformed(offset, "time tag exceeds the 32-bit seconds range"));
        }
        Ok(Self { millis })
    }
}

impl Default for TimeTag {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for TimeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.millis / 1000, self.millis % 1000)
    }
}

impl TryFrom<SystemTime> for TimeTag {
    type Error = CodecError;

    fn try_from(time: SystemTime) -> Result<Self> {
        Self::from_system_time(time)
    }
}
