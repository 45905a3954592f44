//! tftwire Hardware Abstraction Layer
//!
//! This crate defines the contracts between the board-agnostic core (event
//! loop, command parser) and the chip- or panel-specific code that talks to
//! real peripherals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tftwire-core (parser, event loop)      │
//! └─────────────────────────────────────────┘
//!          │                       │
//!          ▼                       ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │  SerialRx       │     │  RenderDevice   │
//! │  (this crate)   │     │  (this crate)   │
//! └─────────────────┘     └─────────────────┘
//!          │                       │
//!          ▼                       ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │ UART driver     │     │ tftwire-drivers │
//! │ (firmware)      │     │ (ILI9341)       │
//! └─────────────────┘     └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::SerialRx`] - Non-blocking serial receive
//! - [`render::RenderDevice`] - Drawing primitives consumed by the parser
//! - [`spi::SpiBus`] - SPI bus writes
//! - [`gpio::OutputPin`] - Digital outputs (D/C, reset)

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod render;
pub mod spi;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use render::RenderDevice;
pub use spi::SpiBus;
pub use uart::SerialRx;
