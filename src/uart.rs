use core::cell::RefCell;

use critical_section::Mutex;
use defmt::*;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{Async, InterruptHandler, UartRx, UartTx};
use heapless::Deque;
use pico_command_coordinator::ByteSource;

pub const RX_FIFO_LEN: usize = 256;

// Bind UART interrupts
bind_interrupts!(pub struct Irqs {
    UART0_IRQ => InterruptHandler<UART0>;
});

/// Bytes received but not yet consumed by the coordinator.
static RX_FIFO: Mutex<RefCell<Deque<u8, RX_FIFO_LEN>>> = Mutex::new(RefCell::new(Deque::new()));

/// Moves received bytes into the shared FIFO. Runs on the interrupt executor
/// so it keeps receiving while the coordinator blocks in a settle delay.
#[embassy_executor::task]
pub async fn rx_task(mut rx: UartRx<'static, UART0, Async>) {
    let mut byte = [0u8; 1];
    loop {
        match rx.read(&mut byte).await {
            Ok(()) => {
                let pushed = critical_section::with(|cs| {
                    RX_FIFO.borrow_ref_mut(cs).push_back(byte[0]).is_ok()
                });
                if !pushed {
                    warn!("rx fifo full, dropped byte");
                }
            }
            Err(e) => warn!("uart rx error: {:?}", e),
        }
    }
}

/// Read side of the serial link as seen by the coordinator.
pub struct RxFifo;

impl ByteSource for RxFifo {
    fn available(&mut self) -> usize {
        critical_section::with(|cs| RX_FIFO.borrow_ref(cs).len())
    }

    fn read_byte(&mut self) -> u8 {
        critical_section::with(|cs| RX_FIFO.borrow_ref_mut(cs).pop_front().unwrap_or(0))
    }
}

/// Write side of the serial link, for prompts and diagnostics.
pub struct SerialWriter<'d> {
    tx: UartTx<'d, UART0, Async>,
}

impl<'d> SerialWriter<'d> {
    pub fn new(tx: UartTx<'d, UART0, Async>) -> Self {
        Self { tx }
    }
}

impl core::fmt::Write for SerialWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.tx.blocking_write(s.as_bytes()).map_err(|_| core::fmt::Error)
    }
}
