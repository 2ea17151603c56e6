#![no_std]
#![no_main]

mod uart;

use core::fmt::Write;
use core::sync::atomic::{AtomicBool, Ordering};

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::uart::{Config as UartConfig, Uart};
use embassy_time::{Delay, Duration, Timer};
use pico_command_coordinator::{Config, Coordinator, DEFAULT_BAUD_RATE, Outcome};
use uart::{Irqs, RxFifo, SerialWriter};
use {defmt_rtt as _, panic_probe as _};

#[unsafe(link_section = ".start_block")]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

static LED_ON: AtomicBool = AtomicBool::new(false);

fn led_on() {
    LED_ON.store(true, Ordering::Relaxed);
}

fn led_off() {
    LED_ON.store(false, Ordering::Relaxed);
}

fn led_toggle() {
    LED_ON.fetch_xor(true, Ordering::Relaxed);
}

fn reboot() {
    info!("rebooting");
    cortex_m::peripheral::SCB::sys_reset();
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let mut led = Output::new(p.PIN_25, Level::Low);

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = DEFAULT_BAUD_RATE;
    let uart = Uart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (tx, rx) = uart.split();

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    unwrap!(spawner.spawn(uart::rx_task(rx)));

    let mut out = SerialWriter::new(tx);
    let mut source = RxFifo;
    let mut coordinator: Coordinator<Delay, fn()> = unwrap!(Coordinator::new(Delay, Config::default()));

    for (name, handler) in [
        ("on", led_on as fn()),
        ("off", led_off),
        ("toggle", led_toggle),
        ("reboot", reboot),
    ] {
        if let Err(e) = coordinator.register_command(name, handler) {
            error!("failed to register {}: {}", name, e);
        }
    }

    let _ = out.write_str("Welcome to Pico command coordinator\r\n");
    let _ = coordinator.list_commands(&mut out);

    loop {
        match coordinator.receive(&mut source) {
            Outcome::Selected => {
                coordinator.invoke_selected();
                led.set_level(Level::from(LED_ON.load(Ordering::Relaxed)));
                let _ = out.write_str("ok\r\n");
            }
            Outcome::NoMatch => {
                let _ = out.write_str("Unknown command: ");
                let _ = coordinator.print_buffer(&mut out);
                let _ = coordinator.list_commands(&mut out);
            }
            Outcome::Overflowed => {
                warn!("line too long: {}", coordinator.buffer_contents());
                let _ = out.write_str("Line too long\r\n");
            }
            Outcome::Incomplete | Outcome::NoData => {
                Timer::after(Duration::from_millis(10)).await;
            }
        }
    }
}
