//! Drawing commands as sent by the host
//!
//! [`DrawCommand`] is the host-side view of a frame: it knows how to lay out
//! each payload and produces complete wire frames. The firmware never builds
//! these; it decodes the same layouts incrementally.

use heapless::Vec;

use crate::command::CommandId;
use crate::frame::{frame_len, FrameBuilder, FrameError};
use crate::payload::{FillRect, ImageHeader, SquareBatchHeader, SquareOffset, TextHeader};

/// A complete drawing command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawCommand<'a> {
    /// Fill a rectangle
    FillRect(FillRect),
    /// Blit an image; `pixels` is forwarded verbatim to the panel
    Image {
        header: ImageHeader,
        pixels: &'a [u8],
    },
    /// Draw a text string
    Text {
        header: TextHeader,
        text: &'a str,
    },
    /// Clear the screen
    Clear,
    /// Send a controller command followed by its data bytes
    Raw { command: u8, data: &'a [u8] },
    /// Fill equally sized squares at offsets from a reference point
    SquareBatch {
        ref_x: u16,
        ref_y: u16,
        width: u16,
        height: u16,
        color: u16,
        squares: &'a [SquareOffset],
    },
}

impl<'a> DrawCommand<'a> {
    /// Wire identifier of this command
    pub fn command_id(&self) -> CommandId {
        match self {
            DrawCommand::FillRect(_) => CommandId::FillRect,
            DrawCommand::Image { .. } => CommandId::Image,
            DrawCommand::Text { .. } => CommandId::DrawString,
            DrawCommand::Clear => CommandId::Clear,
            DrawCommand::Raw { .. } => CommandId::Raw,
            DrawCommand::SquareBatch { .. } => CommandId::SquareBatch,
        }
    }

    /// Declared payload length
    pub fn payload_len(&self) -> usize {
        match self {
            DrawCommand::FillRect(_) => FillRect::SIZE,
            DrawCommand::Image { pixels, .. } => ImageHeader::SIZE + pixels.len(),
            DrawCommand::Text { text, .. } => TextHeader::SIZE + text.len(),
            DrawCommand::Clear => 0,
            DrawCommand::Raw { data, .. } => 1 + data.len(),
            DrawCommand::SquareBatch { squares, .. } => {
                SquareBatchHeader::SIZE + squares.len() * SquareOffset::SIZE
            }
        }
    }

    /// Encode this command as a complete frame
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let mut frame = FrameBuilder::begin(self.command_id(), self.payload_len(), buffer)?;

        match self {
            DrawCommand::FillRect(rect) => frame.push(&rect.to_bytes())?,
            DrawCommand::Image { header, pixels } => {
                frame.push(&header.to_bytes())?;
                frame.push(pixels)?;
            }
            DrawCommand::Text { header, text } => {
                frame.push(&header.to_bytes())?;
                frame.push(text.as_bytes())?;
            }
            DrawCommand::Clear => {}
            DrawCommand::Raw { command, data } => {
                frame.push(&[*command])?;
                frame.push(data)?;
            }
            DrawCommand::SquareBatch {
                ref_x,
                ref_y,
                width,
                height,
                color,
                squares,
            } => {
                let count =
                    u16::try_from(squares.len()).map_err(|_| FrameError::PayloadTooLarge)?;
                let header = SquareBatchHeader {
                    ref_x: *ref_x,
                    ref_y: *ref_y,
                    count,
                    width: *width,
                    height: *height,
                    color: *color,
                };
                frame.push(&header.to_bytes())?;
                for square in squares.iter() {
                    frame.push(&square.to_bytes())?;
                }
            }
        }

        frame.finish()
    }

    /// Encode this command into a heapless Vec
    pub fn encode_to_vec<const N: usize>(&self) -> Result<Vec<u8, N>, FrameError> {
        let mut vec = Vec::new();
        vec.resize(frame_len(self.payload_len()), 0)
            .map_err(|_| FrameError::BufferTooSmall)?;
        let len = self.encode(&mut vec)?;
        vec.truncate(len);
        Ok(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{ETX, STX};

    #[test]
    fn test_clear_frame() {
        let frame = DrawCommand::Clear.encode_to_vec::<16>().unwrap();
        assert_eq!(&frame[..], &[STX, 0x03, 0, 0, 0, 0, ETX]);
    }

    #[test]
    fn test_fill_rect_frame() {
        let cmd = DrawCommand::FillRect(FillRect {
            x0: 0,
            y0: 0,
            x1: 100,
            y1: 100,
            color: 0x001F,
        });
        let frame = cmd.encode_to_vec::<32>().unwrap();

        assert_eq!(frame.len(), 17);
        assert_eq!(&frame[..6], &[STX, 0x00, 0, 0, 0, 10]);
        assert_eq!(&frame[6..16], &[0, 0, 0, 0, 0, 100, 0, 100, 0x00, 0x1F]);
        assert_eq!(frame[16], ETX);
    }

    #[test]
    fn test_text_frame() {
        let cmd = DrawCommand::Text {
            header: TextHeader {
                x: 1,
                y: 2,
                font_size: 3,
                color: 0xFFFF,
            },
            text: "Hi",
        };
        let frame = cmd.encode_to_vec::<32>().unwrap();

        assert_eq!(&frame[2..6], &[0, 0, 0, 9]);
        assert_eq!(&frame[13..15], b"Hi");
    }

    #[test]
    fn test_raw_frame() {
        let cmd = DrawCommand::Raw {
            command: 0x36,
            data: &[0x48],
        };
        let frame = cmd.encode_to_vec::<16>().unwrap();
        assert_eq!(&frame[..], &[STX, 0x04, 0, 0, 0, 2, 0x36, 0x48, ETX]);
    }

    #[test]
    fn test_square_batch_frame() {
        let squares = [SquareOffset { dx: 0, dy: 0 }, SquareOffset { dx: 10, dy: 0 }];
        let cmd = DrawCommand::SquareBatch {
            ref_x: 20,
            ref_y: 30,
            width: 8,
            height: 8,
            color: 0xF800,
            squares: &squares,
        };
        let frame = cmd.encode_to_vec::<64>().unwrap();

        assert_eq!(cmd.payload_len(), 20);
        assert_eq!(&frame[2..6], &[0, 0, 0, 20]);
        // count field
        assert_eq!(&frame[10..12], &[0, 2]);
        // second offset
        assert_eq!(&frame[22..26], &[0, 10, 0, 0]);
        assert_eq!(frame[26], ETX);
    }

    #[test]
    fn test_vec_too_small() {
        let result = DrawCommand::Raw {
            command: 0,
            data: &[0; 32],
        }
        .encode_to_vec::<16>();
        assert_eq!(result, Err(FrameError::BufferTooSmall));
    }
}
