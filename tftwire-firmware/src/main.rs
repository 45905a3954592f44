//! tftwire - serial-driven TFT display firmware
//!
//! A host streams framed drawing commands over UART0; the firmware renders
//! them on an ILI9341 panel wired to SPI0.
//!
//! There is no executor. The buffered UART's interrupt stores incoming bytes
//! and schedules the data-available event; the foreground event loop runs
//! its callback, which drains every pending byte into the command parser.
//!
//! Wiring:
//!
//! | Signal    | Pin     |
//! |-----------|---------|
//! | UART0 TX  | GPIO 0  |
//! | UART0 RX  | GPIO 1  |
//! | TFT CS    | GPIO 17 |
//! | TFT SCK   | GPIO 18 |
//! | TFT MOSI  | GPIO 19 |
//! | TFT DC    | GPIO 20 |
//! | TFT RESET | GPIO 21 |

#![no_std]
#![no_main]

use defmt::*;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::interrupt::typelevel::{Handler, UART0_IRQ};
use embassy_rp::peripherals::{SPI0, UART0};
use embassy_rp::spi::Spi;
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use embassy_time::Delay;
use portable_atomic::{AtomicU16, Ordering};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tftwire_core::config::EVENT_POOL_SIZE;
use tftwire_core::{DisplayConfig, DisplayLink, EventHandle, EventLoop, LinkConfig};
use tftwire_drivers::Ili9341;
use tftwire_hal::spi::SpiConfig;
use tftwire_hal::uart::UartConfig;
use tftwire_hal_rp2040::{spi_config, uart_config, Rp2040Output, Rp2040SerialRx, Rp2040Spi};

mod board;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>, UartRxNotify;
});

type Panel = Ili9341<Rp2040Spi<'static, SPI0>, Rp2040Output<'static>, Rp2040Output<'static>, Delay>;

/// Foreground context handed to every event callback
struct App {
    link: DisplayLink<Rp2040SerialRx, Panel>,
}

static EVENTS: EventLoop<App, EVENT_POOL_SIZE> = EventLoop::new();

/// Raw data-available handle, 0 until the link is started
static DATA_EVENT: AtomicU16 = AtomicU16::new(0);

// UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; board::RX_BUFFER_SIZE]> = StaticCell::new();

/// Second UART0 handler, bound after the buffered driver's
///
/// By the time it runs the driver has moved the RX FIFO into its ring
/// buffer, so all that is left is waking the foreground.
struct UartRxNotify;

impl Handler<UART0_IRQ> for UartRxNotify {
    unsafe fn on_interrupt() {
        if let Some(handle) = EventHandle::from_raw(DATA_EVENT.load(Ordering::Acquire)) {
            EVENTS.schedule(handle);
        }
    }
}

/// Data-available callback
fn on_serial_data(app: &mut App, _index: u16) {
    let n = app.link.poll();
    trace!("drained {} bytes", n);
}

#[cortex_m_rt::entry]
fn main() -> ! {
    info!("tftwire firmware starting...");

    let p = embassy_rp::init(Default::default());

    let link_config = LinkConfig {
        baudrate: board::UART_BAUDRATE,
        etx_policy: board::ETX_POLICY,
    };
    let display_config = DisplayConfig {
        spi_frequency_hz: board::SPI_FREQUENCY_HZ,
        orientation: board::ORIENTATION,
    };
    info!("Board config: {}, {}", link_config, display_config);

    // Panel on SPI0; the panel is the only device, so CS stays asserted
    let _cs = Output::new(p.PIN_17, Level::Low);
    let spi = Spi::new_blocking_txonly(
        p.SPI0,
        p.PIN_18,
        p.PIN_19,
        spi_config(&SpiConfig {
            frequency: display_config.spi_frequency_hz,
            ..Default::default()
        }),
    );
    let dc = Output::new(p.PIN_20, Level::Low);
    let rst = Output::new(p.PIN_21, Level::High);

    let mut panel = Ili9341::new(
        Rp2040Spi::new(spi),
        Rp2040Output::new(dc),
        Rp2040Output::new(rst),
        Delay,
        &display_config,
    );
    match panel.init() {
        Ok(()) => info!("Panel initialized"),
        Err(e) => warn!("Panel init failed: {}", e),
    }

    // Host link on UART0
    let uart = Uart::new_blocking(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        uart_config(&UartConfig {
            baudrate: link_config.baudrate,
            ..Default::default()
        }),
    );
    let tx_buf = TX_BUF.init([0u8; 16]);
    let rx_buf = RX_BUF.init([0u8; board::RX_BUFFER_SIZE]);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();
    info!("UART initialized at {} baud", link_config.baudrate);

    let mut app = App {
        link: DisplayLink::new(Rp2040SerialRx::new(rx), panel, &link_config),
    };
    let handle = app.link.start(&EVENTS, on_serial_data);
    DATA_EVENT.store(handle.raw(), Ordering::Release);

    // Pick up anything that arrived before the handle was published
    EVENTS.schedule(handle);

    info!("Ready");
    loop {
        EVENTS.run(&mut app);
    }
}
