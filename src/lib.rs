#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible in every module.
mod fmt;

pub mod coordinator;
pub mod line_reader;
pub mod registry;
pub mod source;
pub mod timing;

pub use coordinator::{Config, Coordinator, Outcome};
pub use line_reader::{LineReader, Poll};
pub use registry::{CommandEntry, CommandRegistry, Handler};
pub use source::ByteSource;
pub use timing::Timing;

// Common error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Command names must contain at least one byte.
    EmptyName,
    /// The name does not fit the registry's name capacity.
    NameTooLong,
    /// A command with this name is already registered.
    DuplicateName,
    /// Every slot of the command table is taken.
    TableFull,
    /// The transfer rate is not positive or too low to yield a byte per second.
    InvalidBaudRate(i64),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::EmptyName => f.write_str("command name is empty"),
            Error::NameTooLong => f.write_str("command name is too long"),
            Error::DuplicateName => f.write_str("command already registered"),
            Error::TableFull => f.write_str("command table is full"),
            Error::InvalidBaudRate(rate) => write!(f, "invalid baud rate: {}", rate),
        }
    }
}

// Common constants
pub const DEFAULT_LINE_CAPACITY: usize = 32;
pub const DEFAULT_TABLE_CAPACITY: usize = 8;
pub const DEFAULT_NAME_CAPACITY: usize = 32;
pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const END_MARKER: u8 = b'\n';
pub const NEWLINE: &str = "\r\n";
