//! Board-agnostic core logic for the tftwire display firmware
//!
//! This crate contains everything between the UART and the panel driver that
//! does not depend on a specific chip:
//!
//! - Bounded byte FIFO used by the serial path and the parser
//! - Deferred-work scheduler that moves interrupt work to the foreground
//! - Streaming command parser for the drawing protocol
//! - Interrupt-fed serial receive buffer
//! - Display link tying serial, parser and render device together
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod event;
pub mod link;
pub mod parser;
pub mod ringbuf;
pub mod serial;

pub use config::{DisplayConfig, EtxPolicy, LinkConfig, Orientation};
pub use event::{Callback, EventHandle, EventLoop};
pub use link::{DisplayLink, LinkStats};
pub use parser::{CommandParser, ParseState};
pub use ringbuf::RingBuffer;
pub use serial::SerialPort;
