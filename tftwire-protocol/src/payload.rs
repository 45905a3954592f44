//! Fixed payload layouts
//!
//! Every multi-byte field is a big-endian `u16`. Decoders take the leading
//! bytes of a payload and ignore anything after the fixed part; encoders
//! produce exactly the fixed part.

/// Read the big-endian word at `offset`
fn be16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([bytes[offset], bytes[offset + 1]])
}

/// Write `value` big-endian at `offset`
fn put_be16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

/// Last pixel of a span starting at `start` that is `len` pixels long
///
/// Saturates at the panel coordinate limit instead of wrapping.
pub fn span_end(start: u16, len: u16) -> u16 {
    start.saturating_add(len.saturating_sub(1))
}

/// Fill-rectangle payload: `x0, y0, x1, y1, color`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FillRect {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
    pub color: u16,
}

impl FillRect {
    /// Encoded size in bytes
    pub const SIZE: usize = 10;

    /// Decode from the first [`Self::SIZE`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            x0: be16(bytes, 0),
            y0: be16(bytes, 2),
            x1: be16(bytes, 4),
            y1: be16(bytes, 6),
            color: be16(bytes, 8),
        })
    }

    /// Encode to wire bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        put_be16(&mut out, 0, self.x0);
        put_be16(&mut out, 2, self.y0);
        put_be16(&mut out, 4, self.x1);
        put_be16(&mut out, 6, self.y1);
        put_be16(&mut out, 8, self.color);
        out
    }
}

/// Draw-string header: `x, y, font_size (1 byte), color`, followed by text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextHeader {
    pub x: u16,
    pub y: u16,
    pub font_size: u8,
    pub color: u16,
}

impl TextHeader {
    /// Encoded size in bytes (text not included)
    pub const SIZE: usize = 7;

    /// Decode from the first [`Self::SIZE`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            x: be16(bytes, 0),
            y: be16(bytes, 2),
            font_size: bytes[4],
            color: be16(bytes, 5),
        })
    }

    /// Encode to wire bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        put_be16(&mut out, 0, self.x);
        put_be16(&mut out, 2, self.y);
        out[4] = self.font_size;
        put_be16(&mut out, 5, self.color);
        out
    }
}

/// Image header: `x, y, height, width`, followed by pixel bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageHeader {
    pub x: u16,
    pub y: u16,
    pub height: u16,
    pub width: u16,
}

impl ImageHeader {
    /// Encoded size in bytes (pixels not included)
    pub const SIZE: usize = 8;

    /// Decode from the first [`Self::SIZE`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            x: be16(bytes, 0),
            y: be16(bytes, 2),
            height: be16(bytes, 4),
            width: be16(bytes, 6),
        })
    }

    /// Encode to wire bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        put_be16(&mut out, 0, self.x);
        put_be16(&mut out, 2, self.y);
        put_be16(&mut out, 4, self.height);
        put_be16(&mut out, 6, self.width);
        out
    }

    /// True when the image covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Destination window as inclusive corners `(x0, y0, x1, y1)`
    pub fn window(&self) -> (u16, u16, u16, u16) {
        (
            self.x,
            self.y,
            span_end(self.x, self.width),
            span_end(self.y, self.height),
        )
    }
}

/// Square-batch header: `ref_x, ref_y, count, width, height, color`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SquareBatchHeader {
    pub ref_x: u16,
    pub ref_y: u16,
    pub count: u16,
    pub width: u16,
    pub height: u16,
    pub color: u16,
}

impl SquareBatchHeader {
    /// Encoded size in bytes (offset records not included)
    pub const SIZE: usize = 12;

    /// Decode from the first [`Self::SIZE`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            ref_x: be16(bytes, 0),
            ref_y: be16(bytes, 2),
            count: be16(bytes, 4),
            width: be16(bytes, 6),
            height: be16(bytes, 8),
            color: be16(bytes, 10),
        })
    }

    /// Encode to wire bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        put_be16(&mut out, 0, self.ref_x);
        put_be16(&mut out, 2, self.ref_y);
        put_be16(&mut out, 4, self.count);
        put_be16(&mut out, 6, self.width);
        put_be16(&mut out, 8, self.height);
        put_be16(&mut out, 10, self.color);
        out
    }

    /// Rectangle covered by one square, as a fill command
    pub fn square(&self, offset: SquareOffset) -> FillRect {
        let x0 = self.ref_x.saturating_add(offset.dx);
        let y0 = self.ref_y.saturating_add(offset.dy);
        FillRect {
            x0,
            y0,
            x1: span_end(x0, self.width),
            y1: span_end(y0, self.height),
            color: self.color,
        }
    }
}

/// Position of one square relative to the batch reference point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SquareOffset {
    pub dx: u16,
    pub dy: u16,
}

impl SquareOffset {
    /// Encoded size in bytes
    pub const SIZE: usize = 4;

    /// Decode from the first [`Self::SIZE`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            dx: be16(bytes, 0),
            dy: be16(bytes, 2),
        })
    }

    /// Encode to wire bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        put_be16(&mut out, 0, self.dx);
        put_be16(&mut out, 2, self.dy);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_field_order() {
        let bytes = [0x00, 0x01, 0x00, 0x02, 0x01, 0x00, 0x00, 0xF0, 0xF8, 0x00];
        let rect = FillRect::from_bytes(&bytes).unwrap();

        assert_eq!(rect.x0, 1);
        assert_eq!(rect.y0, 2);
        assert_eq!(rect.x1, 256);
        assert_eq!(rect.y1, 240);
        assert_eq!(rect.color, 0xF800);
        assert_eq!(rect.to_bytes(), bytes);
    }

    #[test]
    fn test_short_input_rejected() {
        assert_eq!(FillRect::from_bytes(&[0; 9]), None);
        assert_eq!(TextHeader::from_bytes(&[0; 6]), None);
        assert_eq!(ImageHeader::from_bytes(&[0; 7]), None);
        assert_eq!(SquareBatchHeader::from_bytes(&[0; 11]), None);
    }

    #[test]
    fn test_text_header_single_byte_font_size() {
        let header = TextHeader {
            x: 10,
            y: 20,
            font_size: 2,
            color: 0xFFFF,
        };
        let bytes = header.to_bytes();
        assert_eq!(bytes, [0, 10, 0, 20, 2, 0xFF, 0xFF]);
        assert_eq!(TextHeader::from_bytes(&bytes), Some(header));
    }

    #[test]
    fn test_image_window() {
        let header = ImageHeader {
            x: 5,
            y: 5,
            height: 2,
            width: 2,
        };
        assert_eq!(header.window(), (5, 5, 6, 6));

        let wide = ImageHeader {
            x: 10,
            y: 0,
            height: 1,
            width: 100,
        };
        assert_eq!(wide.window(), (10, 0, 109, 0));
    }

    #[test]
    fn test_image_header_height_before_width() {
        let header = ImageHeader::from_bytes(&[0, 1, 0, 2, 0, 3, 0, 4]).unwrap();
        assert_eq!(header.height, 3);
        assert_eq!(header.width, 4);
    }

    #[test]
    fn test_span_end_saturates() {
        assert_eq!(span_end(0, 1), 0);
        assert_eq!(span_end(10, 0), 10);
        assert_eq!(span_end(u16::MAX - 1, 10), u16::MAX);
    }

    #[test]
    fn test_square_batch_geometry() {
        let header = SquareBatchHeader {
            ref_x: 100,
            ref_y: 50,
            count: 1,
            width: 4,
            height: 3,
            color: 0x07E0,
        };
        let rect = header.square(SquareOffset { dx: 8, dy: 2 });
        assert_eq!(
            rect,
            FillRect {
                x0: 108,
                y0: 52,
                x1: 111,
                y1: 54,
                color: 0x07E0,
            }
        );
    }
}
