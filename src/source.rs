//! Byte source abstraction the line reader pulls from.

use heapless::Deque;

/// A non-blocking stream of incoming bytes, typically a UART receive buffer.
pub trait ByteSource {
    /// Number of bytes that can be read right now without blocking.
    fn available(&mut self) -> usize;

    /// Consume one byte. Only called after `available()` reported data.
    fn read_byte(&mut self) -> u8;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn available(&mut self) -> usize {
        (**self).available()
    }

    fn read_byte(&mut self) -> u8 {
        (**self).read_byte()
    }
}

/// An in-memory FIFO works as a source, e.g. bytes staged by another driver.
impl<const N: usize> ByteSource for Deque<u8, N> {
    fn available(&mut self) -> usize {
        self.len()
    }

    fn read_byte(&mut self) -> u8 {
        self.pop_front().unwrap_or(0)
    }
}
