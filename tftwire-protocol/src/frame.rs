//! Frame constants, errors and encoding.
//!
//! Frame format:
//! - STX (1 byte): 0x02 synchronization byte
//! - CMD (1 byte): command identifier
//! - LENGTH (4 bytes): payload length, big-endian
//! - DATA (LENGTH bytes): command-specific payload
//! - ETX (1 byte): 0x03 end-of-frame byte
//!
//! There is no checksum and no acknowledgement: a receiver that loses sync
//! simply discards bytes until the next STX.

use crate::command::CommandId;

/// Frame start byte
pub const STX: u8 = 0x02;

/// Frame end byte
pub const ETX: u8 = 0x03;

/// Size of the big-endian length field
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Framing bytes around the payload (STX + CMD + LENGTH + ETX)
pub const FRAME_OVERHEAD: usize = 1 + 1 + LENGTH_FIELD_SIZE + 1;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// CMD byte is not in the command table
    UnknownCommand(u8),
    /// Declared length is below the command's minimum
    LengthTooShort,
    /// Declared length is above the command's maximum or the scratch buffer
    LengthTooLong,
    /// Byte in ETX position was not ETX
    MissingEtx,
    /// The render device reported an error while the frame was executed
    Device,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Payload does not fit the length field or a count field
    PayloadTooLarge,
}

/// Total encoded size of a frame carrying `payload_len` bytes
pub const fn frame_len(payload_len: usize) -> usize {
    FRAME_OVERHEAD + payload_len
}

/// Incremental frame writer
///
/// Writes the header up front from the declared payload length, then takes
/// payload pieces in order. [`FrameBuilder::finish`] appends ETX once exactly
/// the declared number of bytes has been pushed.
pub struct FrameBuilder<'a> {
    buffer: &'a mut [u8],
    pos: usize,
    end: usize,
}

impl<'a> FrameBuilder<'a> {
    /// Start a frame for `command` carrying `payload_len` bytes
    pub fn begin(
        command: CommandId,
        payload_len: usize,
        buffer: &'a mut [u8],
    ) -> Result<Self, FrameError> {
        let declared = u32::try_from(payload_len).map_err(|_| FrameError::PayloadTooLarge)?;
        if buffer.len() < frame_len(payload_len) {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = STX;
        buffer[1] = command.to_byte();
        buffer[2..2 + LENGTH_FIELD_SIZE].copy_from_slice(&declared.to_be_bytes());

        let pos = 2 + LENGTH_FIELD_SIZE;
        Ok(Self {
            buffer,
            pos,
            end: pos + payload_len,
        })
    }

    /// Append payload bytes
    pub fn push(&mut self, bytes: &[u8]) -> Result<(), FrameError> {
        if self.pos + bytes.len() > self.end {
            return Err(FrameError::PayloadTooLarge);
        }
        self.buffer[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    /// Terminate the frame, returning its total length
    pub fn finish(self) -> Result<usize, FrameError> {
        if self.pos != self.end {
            return Err(FrameError::BufferTooSmall);
        }
        self.buffer[self.pos] = ETX;
        Ok(self.pos + 1)
    }
}

/// Encode a frame whose payload is the concatenation of `parts`
///
/// Returns the number of bytes written to `buffer`.
pub fn encode_frame(
    command: CommandId,
    parts: &[&[u8]],
    buffer: &mut [u8],
) -> Result<usize, FrameError> {
    let payload_len: usize = parts.iter().map(|part| part.len()).sum();

    let mut builder = FrameBuilder::begin(command, payload_len, buffer)?;
    for part in parts {
        builder.push(part)?;
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty_payload() {
        let mut buffer = [0u8; 16];
        let len = encode_frame(CommandId::Clear, &[], &mut buffer).unwrap();

        assert_eq!(len, FRAME_OVERHEAD);
        assert_eq!(&buffer[..len], &[STX, 0x03, 0, 0, 0, 0, ETX]);
    }

    #[test]
    fn test_encode_length_is_big_endian() {
        let payload = [0xAAu8; 300];
        let mut buffer = [0u8; 320];
        let len = encode_frame(CommandId::Raw, &[&payload[..]], &mut buffer).unwrap();

        assert_eq!(len, 307);
        assert_eq!(&buffer[2..6], &[0x00, 0x00, 0x01, 0x2C]);
        assert_eq!(buffer[306], ETX);
    }

    #[test]
    fn test_encode_concatenates_parts() {
        let mut buffer = [0u8; 16];
        let len = encode_frame(CommandId::Raw, &[&[0x2C][..], &[1, 2][..]], &mut buffer).unwrap();

        assert_eq!(&buffer[..len], &[STX, 0x04, 0, 0, 0, 3, 0x2C, 1, 2, ETX]);
    }

    #[test]
    fn test_builder_rejects_overrun() {
        let mut buffer = [0u8; 16];
        let mut builder = FrameBuilder::begin(CommandId::Raw, 2, &mut buffer).unwrap();

        builder.push(&[1]).unwrap();
        assert_eq!(builder.push(&[2, 3]), Err(FrameError::PayloadTooLarge));
        builder.push(&[2]).unwrap();
        assert_eq!(builder.finish(), Ok(9));
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buffer = [0u8; 6];
        let result = encode_frame(CommandId::Clear, &[], &mut buffer);
        assert_eq!(result, Err(FrameError::BufferTooSmall));
    }
}
