//! Settle delays derived from the link's transfer rate.
//!
//! A serial frame carries one start and one stop bit, so a byte costs ten bit
//! times and the link moves `baud / 10` bytes per second. The reader waits
//! long enough for a full line to arrive before it starts consuming, and
//! while draining an overflowed line it waits long enough for the upstream
//! device buffer to refill.

use crate::Error;

const BITS_PER_BYTE: i64 = 10;
const MILLIS_PER_SEC: u64 = 1000;

/// The two blocking pauses used by [`LineReader`](crate::LineReader).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Pause before reading a line, sized to the line buffer.
    pub input_delay_ms: u32,
    /// Pause between drain passes, sized to the source's own buffer.
    pub drain_delay_ms: u32,
}

impl Timing {
    /// Calibrate for `baud` with a line buffer of `line_len` bytes and an
    /// upstream buffer of `source_len` bytes.
    pub fn from_baud(baud: i64, line_len: usize, source_len: usize) -> Result<Self, Error> {
        if baud <= 0 {
            return Err(Error::InvalidBaudRate(baud));
        }
        let bytes_per_sec = (baud / BITS_PER_BYTE) as u64;
        if bytes_per_sec == 0 {
            return Err(Error::InvalidBaudRate(baud));
        }

        Ok(Self {
            input_delay_ms: fill_time_ms(line_len, bytes_per_sec),
            drain_delay_ms: fill_time_ms(source_len, bytes_per_sec),
        })
    }
}

/// Milliseconds to move `len` bytes, rounded up.
fn fill_time_ms(len: usize, bytes_per_sec: u64) -> u32 {
    let total = (len as u64).saturating_mul(MILLIS_PER_SEC);
    let ms = total.div_ceil(bytes_per_sec);
    u32::try_from(ms).unwrap_or(u32::MAX)
}
