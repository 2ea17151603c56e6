use embedded_hal::delay::DelayNs;

use crate::source::ByteSource;
use crate::timing::Timing;

/// Result of one [`LineReader::poll`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll<'a> {
    /// The source had nothing to read.
    NoData,
    /// A full line arrived before the buffer filled up.
    Complete(&'a [u8]),
    /// The source ran dry before the end marker arrived.
    Incomplete,
    /// The line did not fit; it was truncated and the rest drained.
    Overflowed,
}

/// Assembles end-marker delimited lines from a [`ByteSource`] into a fixed
/// buffer of `N` bytes, the last of which is reserved for the terminator.
///
/// The buffer holds a NUL-terminated copy of the most recent line. It is
/// overwritten in place by every poll that reads bytes.
pub struct LineReader<const N: usize> {
    buf: [u8; N],
    len: usize,
    valid: bool,
    end_marker: u8,
    drain_limit: usize,
}

impl<const N: usize> LineReader<N> {
    pub const fn new(end_marker: u8, drain_limit: usize) -> Self {
        const { assert!(N > 0, "line buffer needs room for the terminator") };
        Self {
            buf: [0; N],
            len: 0,
            valid: false,
            end_marker,
            drain_limit,
        }
    }

    /// Read the next line if the source has data.
    ///
    /// Blocks for `timing.input_delay_ms` before consuming so a slow link can
    /// deliver the whole line. On overflow, discards everything the source
    /// has buffered, pausing `timing.drain_delay_ms` after each pass, until
    /// a pass finds the source empty or `drain_limit` bytes were dropped.
    pub fn poll<S, D>(&mut self, source: &mut S, delay: &mut D, timing: &Timing) -> Poll<'_>
    where
        S: ByteSource + ?Sized,
        D: DelayNs + ?Sized,
    {
        if source.available() == 0 {
            return Poll::NoData;
        }

        delay.delay_ms(timing.input_delay_ms);

        let mut ndx = 0;
        while source.available() > 0 {
            let byte = source.read_byte();

            if byte == self.end_marker {
                self.terminate(ndx, true);
                trace!("line complete: {} bytes", ndx);
                return Poll::Complete(&self.buf[..ndx]);
            }

            if ndx >= N - 1 {
                self.terminate(ndx, false);
                let dropped = self.drain(source, delay, timing);
                debug!("line overflowed at {} bytes, drained {}", ndx, dropped);
                return Poll::Overflowed;
            }

            self.buf[ndx] = byte;
            ndx += 1;
        }

        self.terminate(ndx, false);
        trace!("source ran dry after {} bytes", ndx);
        Poll::Incomplete
    }

    fn terminate(&mut self, len: usize, valid: bool) {
        self.buf[len] = 0;
        self.len = len;
        self.valid = valid;
    }

    fn drain<S, D>(&mut self, source: &mut S, delay: &mut D, timing: &Timing) -> usize
    where
        S: ByteSource + ?Sized,
        D: DelayNs + ?Sized,
    {
        let mut dropped = 0;
        while source.available() > 0 {
            while source.available() > 0 {
                if dropped >= self.drain_limit {
                    warn!("drain limit of {} bytes reached, source still busy", self.drain_limit);
                    return dropped;
                }
                let _ = source.read_byte();
                dropped += 1;
            }
            delay.delay_ms(timing.drain_delay_ms);
        }
        dropped
    }

    /// Whether the buffer holds a line that ended with the end marker.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The last line, without terminator. Empty if it is not valid UTF-8.
    pub fn contents(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The last line including its NUL terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[..=self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total buffer size, terminator included.
    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn end_marker(&self) -> u8 {
        self.end_marker
    }
}
