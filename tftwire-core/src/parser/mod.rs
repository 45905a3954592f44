//! Streaming command parser
//!
//! Decodes the framed drawing protocol one byte at a time and drives a
//! [`RenderDevice`] while the frame is still arriving:
//!
//! ```text
//! ExpectStx -> ExpectCmd -> ExpectSize -> ExpectData -> ExpectEtx -> ExpectStx
//! ```
//!
//! A zero-length frame (clear) goes from `ExpectSize` straight to
//! `ExpectEtx`. An unknown command or out-of-range length drops back to
//! `ExpectStx`.
//!
//! Malformed frames are dropped and the parser goes back to hunting for STX.
//! Nothing is ever reported to the sender.

mod handler;

use tftwire_hal::RenderDevice;
use tftwire_protocol::{
    CommandId, FrameError, ImageHeader, SquareBatchHeader, EMPTY_PAYLOAD_SENTINEL, ETX, STX,
};

use crate::config::{EtxPolicy, SCRATCH_SIZE};
use crate::ringbuf::RingBuffer;

use handler::Handler;

/// Top-level protocol state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseState {
    /// Discarding bytes until STX
    ExpectStx,
    /// Next byte is the command id
    ExpectCmd,
    /// Collecting the 4-byte big-endian length
    ExpectSize,
    /// Passing payload bytes to the command handler
    ExpectData,
    /// Next byte closes the frame
    ExpectEtx,
}

/// Byte-at-a-time frame decoder
///
/// `SCRATCH` bounds the payload of buffered commands (fill-rect, string).
/// Streamed commands (image, raw, square batch) are not limited by it, but
/// their headers pass through the scratch buffer, so `SCRATCH` must be at
/// least [`SquareBatchHeader::SIZE`]; smaller values fail to compile.
pub struct CommandParser<const SCRATCH: usize = SCRATCH_SIZE> {
    state: ParseState,
    etx_policy: EtxPolicy,
    /// Command of the frame in flight
    command: Option<CommandId>,
    /// Length bytes received so far
    size_bytes: u8,
    /// Declared payload length
    declared: u32,
    /// Payload bytes consumed so far
    consumed: u32,
    handler: Handler,
    /// Buffered payload exceeded the scratch buffer
    oversized: bool,
    /// The device reported an error during this frame
    faulted: bool,
    scratch: RingBuffer<[u8; SCRATCH]>,
}

impl<const SCRATCH: usize> Default for CommandParser<SCRATCH> {
    fn default() -> Self {
        Self::new(EtxPolicy::default())
    }
}

impl<const SCRATCH: usize> CommandParser<SCRATCH> {
    /// Streamed command headers must fit in the scratch buffer
    const HEADER_FITS: () = assert!(
        SCRATCH >= SquareBatchHeader::SIZE && SCRATCH >= ImageHeader::SIZE,
        "parser scratch buffer is smaller than a streamed command header"
    );

    /// Create a parser waiting for STX
    pub const fn new(etx_policy: EtxPolicy) -> Self {
        let () = Self::HEADER_FITS;
        Self {
            state: ParseState::ExpectStx,
            etx_policy,
            command: None,
            size_bytes: 0,
            declared: 0,
            consumed: 0,
            handler: Handler::Idle,
            oversized: false,
            faulted: false,
            scratch: RingBuffer::new([0; SCRATCH]),
        }
    }

    /// Current protocol state
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Command of the frame in flight, if any
    pub fn command(&self) -> Option<CommandId> {
        self.command
    }

    /// Drop any frame in flight and wait for STX
    pub fn reset(&mut self) {
        self.state = ParseState::ExpectStx;
        self.command = None;
        self.size_bytes = 0;
        self.declared = 0;
        self.consumed = 0;
        self.handler = Handler::Idle;
        self.oversized = false;
        self.faulted = false;
    }

    /// Feed one received byte
    ///
    /// Returns `Ok(Some(id))` when a frame closes, `Ok(None)` when more bytes
    /// are needed, or `Err` when a frame was dropped or its device calls
    /// failed. In every case the parser is ready for the next byte.
    pub fn process<R: RenderDevice>(
        &mut self,
        byte: u8,
        device: &mut R,
    ) -> Result<Option<CommandId>, FrameError> {
        match self.state {
            ParseState::ExpectStx => {
                if byte == STX {
                    self.state = ParseState::ExpectCmd;
                }
                Ok(None)
            }
            ParseState::ExpectCmd => match CommandId::from_byte(byte) {
                Some(command) => {
                    self.command = Some(command);
                    self.scratch.flush();
                    self.size_bytes = 0;
                    self.declared = 0;
                    self.state = ParseState::ExpectSize;
                    Ok(None)
                }
                None => {
                    self.reset();
                    Err(FrameError::UnknownCommand(byte))
                }
            },
            ParseState::ExpectSize => {
                self.declared = (self.declared << 8) | u32::from(byte);
                self.size_bytes += 1;
                if self.size_bytes < 4 {
                    return Ok(None);
                }
                self.begin_payload(device)
            }
            ParseState::ExpectData => {
                self.consumed += 1;
                let last = self.consumed == self.declared;

                if !self.faulted {
                    let result = self
                        .handler
                        .on_byte(byte, last, &mut self.scratch, device);
                    if result.is_err() {
                        self.fault(device);
                    }
                }

                if last {
                    self.state = ParseState::ExpectEtx;
                }
                Ok(None)
            }
            ParseState::ExpectEtx => {
                let result = self.close(byte);
                self.reset();
                result
            }
        }
    }

    /// Validate the declared length and set up the data phase
    fn begin_payload<R: RenderDevice>(
        &mut self,
        device: &mut R,
    ) -> Result<Option<CommandId>, FrameError> {
        let Some(command) = self.command else {
            self.reset();
            return Ok(None);
        };

        let spec = command.spec();
        if self.declared < spec.min_len {
            self.reset();
            return Err(FrameError::LengthTooShort);
        }
        if !spec.accepts_len(self.declared) {
            self.reset();
            return Err(FrameError::LengthTooLong);
        }

        if self.declared == 0 {
            if handler::execute_empty(command, EMPTY_PAYLOAD_SENTINEL, device).is_err() {
                self.faulted = true;
            }
            self.state = ParseState::ExpectEtx;
            return Ok(None);
        }

        self.consumed = 0;
        self.handler = Handler::for_command(command, self.declared, SCRATCH);
        if self.handler == Handler::Discard {
            self.oversized = true;
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "{} payload of {} bytes exceeds scratch, discarding",
                command,
                self.declared
            );
        }
        self.state = ParseState::ExpectData;
        Ok(None)
    }

    /// Stop driving the device for the rest of this frame
    fn fault<R: RenderDevice>(&mut self, device: &mut R) {
        if self.handler.window_open() {
            let _ = device.end_write();
        }
        self.handler = Handler::Discard;
        self.faulted = true;
    }

    /// Outcome of the frame closed by `byte`
    fn close(&self, byte: u8) -> Result<Option<CommandId>, FrameError> {
        if self.etx_policy == EtxPolicy::Strict && byte != ETX {
            return Err(FrameError::MissingEtx);
        }
        if self.oversized {
            return Err(FrameError::LengthTooLong);
        }
        if self.faulted {
            return Err(FrameError::Device);
        }
        Ok(self.command)
    }
}
