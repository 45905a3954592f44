//! UART receive side
//!
//! `embassy-rp`'s buffered UART fills a ring buffer from its interrupt
//! handler. [`Rp2040SerialRx`] drains that buffer without ever blocking, so
//! it can be polled from an event callback.

use embassy_rp::uart::{self, BufferedUartRx};
use embedded_io::{Read, ReadReady};
use tftwire_hal::uart::{Parity, StopBits, UartConfig};
use tftwire_hal::SerialRx;

/// Translate the shared UART settings into an `embassy-rp` config
pub fn uart_config(config: &UartConfig) -> uart::Config {
    let mut out = uart::Config::default();
    out.baudrate = config.baudrate;
    out.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    out
}

/// Buffered UART receiver driven through [`tftwire_hal::SerialRx`]
pub struct Rp2040SerialRx {
    rx: BufferedUartRx,
    errors: u32,
}

impl Rp2040SerialRx {
    pub fn new(rx: BufferedUartRx) -> Self {
        Self { rx, errors: 0 }
    }

    /// Line errors (overrun, framing, parity, break) seen so far
    pub fn errors(&self) -> u32 {
        self.errors
    }
}

impl SerialRx for Rp2040SerialRx {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        if buf.is_empty() {
            return 0;
        }
        match self.rx.read_ready() {
            Ok(true) => {}
            Ok(false) => return 0,
            Err(_e) => {
                self.errors = self.errors.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("UART error: {}", _e);
                return 0;
            }
        }
        // Data is pending, so this returns without waiting
        match self.rx.read(buf) {
            Ok(n) => n,
            Err(_e) => {
                self.errors = self.errors.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("UART error: {}", _e);
                0
            }
        }
    }
}
