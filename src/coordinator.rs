//! Ties the line reader to the command registry.
//!
//! Every call to [`Coordinator::receive`] runs one receive cycle: poll the
//! source for a line, look the line up, and remember which handler (if any)
//! it selected. [`Coordinator::invoke_selected`] then runs that handler. A
//! cycle that ends without a matching complete line always clears the
//! selection, so a stale handler can never run twice by accident.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;

use crate::line_reader::{LineReader, Poll};
use crate::registry::{CommandRegistry, Handler};
use crate::source::ByteSource;
use crate::timing::Timing;
use crate::{
    DEFAULT_BAUD_RATE, DEFAULT_LINE_CAPACITY, DEFAULT_NAME_CAPACITY, DEFAULT_TABLE_CAPACITY,
    END_MARKER, Error, NEWLINE,
};

/// Bytes held by a typical UART receive FIFO on the far side of the link.
pub const DEFAULT_SOURCE_BUFFER_LEN: usize = 64;
/// Upper bound on bytes discarded while recovering from one overflow.
pub const DEFAULT_DRAIN_LIMIT: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Byte that terminates a command line.
    pub end_marker: u8,
    /// Link speed the settle delays are calibrated for.
    pub baud_rate: u32,
    /// Size of the sender's buffer, used to pace the overflow drain.
    pub source_buffer_len: usize,
    pub drain_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            end_marker: END_MARKER,
            baud_rate: DEFAULT_BAUD_RATE,
            source_buffer_len: DEFAULT_SOURCE_BUFFER_LEN,
            drain_limit: DEFAULT_DRAIN_LIMIT,
        }
    }
}

/// How a receive cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Nothing to read.
    NoData,
    /// The source stopped before the end marker.
    Incomplete,
    /// The line was longer than the buffer.
    Overflowed,
    /// A complete line that names no registered command.
    NoMatch,
    /// A complete line that selected a command.
    Selected,
}

/// Line-driven command dispatcher over a fixed buffer of `N` bytes and a
/// table of `M` commands with names up to `L` bytes.
pub struct Coordinator<
    D,
    H,
    const N: usize = { DEFAULT_LINE_CAPACITY },
    const M: usize = { DEFAULT_TABLE_CAPACITY },
    const L: usize = { DEFAULT_NAME_CAPACITY },
> {
    delay: D,
    config: Config,
    timing: Timing,
    reader: LineReader<N>,
    registry: CommandRegistry<H, M, L>,
    selected: Option<usize>,
}

impl<D, H, const N: usize, const M: usize, const L: usize> Coordinator<D, H, N, M, L>
where
    D: DelayNs,
    H: Handler,
{
    pub fn new(delay: D, config: Config) -> Result<Self, Error> {
        let timing = Timing::from_baud(config.baud_rate.into(), N, config.source_buffer_len)?;
        info!(
            "coordinator ready: {} byte lines, {} commands, {} baud",
            N, M, config.baud_rate
        );

        Ok(Self {
            delay,
            config,
            timing,
            reader: LineReader::new(config.end_marker, config.drain_limit),
            registry: CommandRegistry::new(),
            selected: None,
        })
    }

    /// Run one receive cycle and report how it ended.
    pub fn receive<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Outcome {
        let outcome = match self.reader.poll(source, &mut self.delay, &self.timing) {
            Poll::NoData => Outcome::NoData,
            Poll::Incomplete => Outcome::Incomplete,
            Poll::Overflowed => Outcome::Overflowed,
            Poll::Complete(line) => match self.registry.position(line) {
                Some(ndx) => {
                    self.selected = Some(ndx);
                    return Outcome::Selected;
                }
                None => Outcome::NoMatch,
            },
        };

        if outcome == Outcome::NoMatch {
            debug!("unknown command: {}", self.reader.contents());
        }
        self.selected = None;
        outcome
    }

    /// Run one receive cycle. True iff a registered command was selected.
    pub fn receive_command<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> bool {
        self.receive(source) == Outcome::Selected
    }

    /// Run the handler chosen by the last receive cycle, if there is one.
    pub fn invoke_selected(&mut self) -> bool {
        match self.selected {
            Some(ndx) => self.registry.call(ndx),
            None => false,
        }
    }

    pub fn register_command(&mut self, name: &str, handler: H) -> Result<(), Error> {
        self.registry.register(name, handler)
    }

    /// Recalibrate the settle delays. An invalid rate leaves them unchanged.
    pub fn set_baud_rate(&mut self, baud: i64) -> Result<(), Error> {
        let rate = u32::try_from(baud).map_err(|_| Error::InvalidBaudRate(baud))?;
        self.timing = Timing::from_baud(baud, N, self.config.source_buffer_len)?;
        self.config.baud_rate = rate;
        debug!(
            "baud {}: input delay {} ms, drain delay {} ms",
            rate, self.timing.input_delay_ms, self.timing.drain_delay_ms
        );
        Ok(())
    }

    /// The last line read, truncated if it overflowed.
    pub fn buffer_contents(&self) -> &str {
        self.reader.contents()
    }

    pub fn print_buffer<W: Write + ?Sized>(&self, out: &mut W) -> core::fmt::Result {
        out.write_str(self.reader.contents())?;
        out.write_str(NEWLINE)
    }

    pub fn list_commands<W: Write + ?Sized>(&self, out: &mut W) -> core::fmt::Result {
        self.registry.list(out)
    }

    /// Write a fixed line so the output path can be checked end to end.
    pub fn write_test_line<W: Write + ?Sized>(&self, out: &mut W) -> core::fmt::Result {
        out.write_str("Hello World!")?;
        out.write_str(NEWLINE)
    }

    /// Name of the currently selected command.
    pub fn selected(&self) -> Option<&str> {
        self.selected
            .and_then(|ndx| self.registry.get(ndx))
            .map(|entry| entry.name())
    }

    pub fn reader(&self) -> &LineReader<N> {
        &self.reader
    }

    pub fn registry(&self) -> &CommandRegistry<H, M, L> {
        &self.registry
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
