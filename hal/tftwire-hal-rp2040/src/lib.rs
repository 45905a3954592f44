//! RP2040-specific HAL for the tftwire display firmware
//!
//! Implements the shared `tftwire-hal` traits on top of `embassy-rp`
//! peripherals:
//!
//! - Push-pull outputs for the panel's D/C and reset lines
//! - Blocking transmit-only SPI to the panel
//! - Non-blocking drain of the interrupt-buffered UART

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;
pub mod uart;

pub use gpio::Rp2040Output;
pub use spi::{spi_config, Rp2040Spi};
pub use uart::{uart_config, Rp2040SerialRx};
