//! Per-command payload handlers
//!
//! Two shapes exist. Buffered handlers collect the payload in the scratch
//! buffer and call the device once it is complete. Streamed handlers buffer
//! at most a small fixed header, then forward every further byte to the
//! device as it arrives, so payload size is limited only by the length field.

use tftwire_hal::RenderDevice;
use tftwire_protocol::{
    CommandId, FillRect, ImageHeader, PayloadKind, SquareBatchHeader, SquareOffset, TextHeader,
    EMPTY_PAYLOAD_SENTINEL,
};

use crate::ringbuf::RingBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ImagePhase {
    /// Collecting the 8-byte header
    Header,
    /// Window open, forwarding pixel bytes
    Pixels,
    /// Zero-area image, dropping the rest
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RawPhase {
    Command,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SquarePhase {
    Header,
    Records {
        header: SquareBatchHeader,
        remaining: u16,
    },
}

/// Data-phase handler of the frame in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Handler {
    /// No frame in flight
    Idle,
    /// Accumulate the whole payload, execute on the last byte
    Buffer(CommandId),
    /// Count bytes without acting on them
    Discard,
    Image(ImagePhase),
    Raw(RawPhase),
    Squares(SquarePhase),
}

impl Handler {
    /// Handler for a frame of `command` declaring `declared` payload bytes
    ///
    /// A buffered payload larger than the scratch buffer gets [`Handler::Discard`].
    pub(super) fn for_command(command: CommandId, declared: u32, scratch_capacity: usize) -> Self {
        match command {
            CommandId::Image => Handler::Image(ImagePhase::Header),
            CommandId::Raw => Handler::Raw(RawPhase::Command),
            CommandId::SquareBatch => Handler::Squares(SquarePhase::Header),
            _ => match command.spec().kind {
                PayloadKind::Buffered if (declared as usize) <= scratch_capacity => {
                    Handler::Buffer(command)
                }
                _ => Handler::Discard,
            },
        }
    }

    /// Whether an addressed write window is open on the device
    pub(super) fn window_open(&self) -> bool {
        matches!(self, Handler::Image(ImagePhase::Pixels))
    }

    /// Consume one payload byte
    ///
    /// `last` is set on the final byte of the declared payload; handlers
    /// finish their work on it and return to their initial phase.
    pub(super) fn on_byte<S, R>(
        &mut self,
        byte: u8,
        last: bool,
        scratch: &mut RingBuffer<S>,
        device: &mut R,
    ) -> Result<(), R::Error>
    where
        S: AsRef<[u8]> + AsMut<[u8]>,
        R: RenderDevice,
    {
        match self {
            Handler::Idle | Handler::Discard => {}
            Handler::Buffer(command) => {
                // Cannot overflow: the declared length was checked against capacity
                let _ = scratch.push(byte);
                if last {
                    execute_buffered(*command, scratch.make_contiguous(), device)?;
                    scratch.flush();
                }
            }
            Handler::Image(phase) => match phase {
                ImagePhase::Header => {
                    let _ = scratch.push(byte);
                    if scratch.used() == ImageHeader::SIZE {
                        let header = ImageHeader::from_bytes(scratch.make_contiguous());
                        scratch.flush();
                        match header {
                            Some(header) if !header.is_empty() => {
                                let (x0, y0, x1, y1) = header.window();
                                device.begin_area_write(x0, y0, x1, y1)?;
                                *phase = ImagePhase::Pixels;
                            }
                            _ => *phase = ImagePhase::Skip,
                        }
                    }
                    if last && *phase == ImagePhase::Pixels {
                        // Closed from here on, whether or not end_write succeeds
                        *phase = ImagePhase::Header;
                        device.end_write()?;
                    }
                }
                ImagePhase::Pixels => {
                    device.write_pixel_byte(byte)?;
                    if last {
                        *phase = ImagePhase::Header;
                        device.end_write()?;
                    }
                }
                ImagePhase::Skip => {}
            },
            Handler::Raw(phase) => match phase {
                RawPhase::Command => {
                    *phase = RawPhase::Data;
                    device.send_command_byte(byte)?;
                }
                RawPhase::Data => device.send_data_byte(byte)?,
            },
            Handler::Squares(phase) => {
                let _ = scratch.push(byte);
                match phase {
                    SquarePhase::Header => {
                        if scratch.used() == SquareBatchHeader::SIZE {
                            if let Some(header) =
                                SquareBatchHeader::from_bytes(scratch.make_contiguous())
                            {
                                *phase = SquarePhase::Records {
                                    header,
                                    remaining: header.count,
                                };
                            }
                            scratch.flush();
                        }
                    }
                    SquarePhase::Records { header, remaining } => {
                        if scratch.used() == SquareOffset::SIZE {
                            let offset = SquareOffset::from_bytes(scratch.make_contiguous());
                            scratch.flush();
                            if let (Some(offset), true) = (offset, *remaining > 0) {
                                *remaining -= 1;
                                let rect = header.square(offset);
                                device.fill_area(rect.x0, rect.y0, rect.x1, rect.y1, rect.color)?;
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Run a fully buffered command
fn execute_buffered<R: RenderDevice>(
    command: CommandId,
    payload: &[u8],
    device: &mut R,
) -> Result<(), R::Error> {
    match command {
        CommandId::FillRect => {
            if let Some(rect) = FillRect::from_bytes(payload) {
                device.fill_area(rect.x0, rect.y0, rect.x1, rect.y1, rect.color)?;
            }
        }
        CommandId::DrawString => {
            if let Some(header) = TextHeader::from_bytes(payload) {
                let text = decode_text(&payload[TextHeader::SIZE..]);
                device.draw_string(text, header.x, header.y, header.font_size, header.color)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Longest valid UTF-8 prefix of `bytes`
fn decode_text(bytes: &[u8]) -> &str {
    match core::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    }
}

/// Run a zero-length command
///
/// The handler receives [`EMPTY_PAYLOAD_SENTINEL`] in place of a data byte.
pub(super) fn execute_empty<R: RenderDevice>(
    command: CommandId,
    sentinel: u8,
    device: &mut R,
) -> Result<(), R::Error> {
    if command == CommandId::Clear && sentinel == EMPTY_PAYLOAD_SENTINEL {
        device.clear_screen()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_keeps_valid_prefix() {
        assert_eq!(decode_text(b"hello"), "hello");
        assert_eq!(decode_text(&[b'o', b'k', 0xFF, b'x']), "ok");
        assert_eq!(decode_text(&[0xC3]), "");
    }

    #[test]
    fn test_oversized_buffered_is_discarded() {
        assert_eq!(
            Handler::for_command(CommandId::FillRect, 10, 512),
            Handler::Buffer(CommandId::FillRect)
        );
        assert_eq!(
            Handler::for_command(CommandId::DrawString, 513, 512),
            Handler::Discard
        );
        // Streamed commands ignore the scratch capacity
        assert_eq!(
            Handler::for_command(CommandId::Image, 100_000, 512),
            Handler::Image(ImagePhase::Header)
        );
    }
}
