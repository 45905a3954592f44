//! tftwire Serial Drawing Protocol
//!
//! This crate defines the byte stream a host sends to a tftwire display over
//! UART. Every message is one frame:
//!
//! ```text
//! ┌─────┬─────┬────────────┬─────────────┬─────┐
//! │ STX │ CMD │ LENGTH     │ DATA        │ ETX │
//! │ 1B  │ 1B  │ 4B (BE)    │ LENGTH B    │ 1B  │
//! └─────┴─────┴────────────┴─────────────┴─────┘
//! ```
//!
//! The link is fire-and-forget: there is no checksum and no reply. The
//! receiver resynchronises on the next STX after any malformed frame.
//!
//! Payloads are either small fixed layouts (rectangle, text) or unbounded
//! streams (image pixels, raw controller bytes) that the receiver forwards
//! without buffering.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod frame;
pub mod messages;
pub mod payload;

pub use command::{CommandId, CommandSpec, PayloadKind, COMMANDS, EMPTY_PAYLOAD_SENTINEL};
pub use frame::{encode_frame, FrameBuilder, FrameError, ETX, FRAME_OVERHEAD, STX};
pub use messages::DrawCommand;
pub use payload::{FillRect, ImageHeader, SquareBatchHeader, SquareOffset, TextHeader};
