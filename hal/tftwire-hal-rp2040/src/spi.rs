//! Blocking SPI master
//!
//! The panel never answers, so the bus is set up transmit-only and every
//! write blocks until the bytes are in the TX FIFO. `flush` waits for the
//! shift register to drain before the D/C line may change.

use embassy_rp::spi::{self, Blocking, Instance, Spi};
use tftwire_hal::spi::{Phase, Polarity, SpiConfig};
use tftwire_hal::SpiBus;

/// Translate the shared SPI settings into an `embassy-rp` config
pub fn spi_config(config: &SpiConfig) -> spi::Config {
    let mut out = spi::Config::default();
    out.frequency = config.frequency;
    out.polarity = match config.polarity {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    out.phase = match config.phase {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    out
}

/// `embassy-rp` blocking SPI driven through [`tftwire_hal::SpiBus`]
pub struct Rp2040Spi<'d, T: Instance> {
    spi: Spi<'d, T, Blocking>,
}

impl<'d, T: Instance> Rp2040Spi<'d, T> {
    pub fn new(spi: Spi<'d, T, Blocking>) -> Self {
        Self { spi }
    }
}

impl<T: Instance> SpiBus for Rp2040Spi<'_, T> {
    type Error = spi::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.spi.blocking_write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        embedded_hal::spi::SpiBus::<u8>::flush(&mut self.spi)
    }
}
