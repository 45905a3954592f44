//! Render device trait
//!
//! The drawing primitives the command parser needs from a panel driver.
//! Coordinates are panel pixels; colours are RGB565 words.

/// Render device
///
/// Two families of operations are exposed:
///
/// - one-shot primitives (`fill_area`, `draw_string`, `clear_screen`) invoked
///   once a small command has been fully received
/// - a streaming sink (`begin_area_write`, `write_pixel_byte`, `end_write`)
///   and raw controller access (`send_command_byte`, `send_data_byte`) used for
///   payloads that are forwarded byte by byte without buffering
pub trait RenderDevice {
    /// Error type for device operations
    type Error;

    /// Fill the rectangle spanned by two corners (inclusive) with `color`
    fn fill_area(&mut self, x0: u16, y0: u16, x1: u16, y1: u16, color: u16)
        -> Result<(), Self::Error>;

    /// Draw `text` with its top-left corner at (`x`, `y`)
    ///
    /// - `size`: Font size selector (1 = smallest)
    /// - `color`: Foreground colour; the background is left untouched
    fn draw_string(&mut self, text: &str, x: u16, y: u16, size: u8, color: u16)
        -> Result<(), Self::Error>;

    /// Clear the whole panel to black
    fn clear_screen(&mut self) -> Result<(), Self::Error>;

    /// Open an addressed write window (inclusive corners)
    ///
    /// Subsequent `write_pixel_byte` calls fill the window row by row.
    fn begin_area_write(&mut self, x0: u16, y0: u16, x1: u16, y1: u16)
        -> Result<(), Self::Error>;

    /// Stream one byte of pixel data into the open window
    fn write_pixel_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Close the write window opened by `begin_area_write`
    fn end_write(&mut self) -> Result<(), Self::Error>;

    /// Send a byte to the controller as a command
    fn send_command_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Send a byte to the controller as command data
    fn send_data_byte(&mut self, byte: u8) -> Result<(), Self::Error>;
}

impl<T: RenderDevice + ?Sized> RenderDevice for &mut T {
    type Error = T::Error;

    fn fill_area(&mut self, x0: u16, y0: u16, x1: u16, y1: u16, color: u16)
        -> Result<(), Self::Error> {
        (**self).fill_area(x0, y0, x1, y1, color)
    }

    fn draw_string(&mut self, text: &str, x: u16, y: u16, size: u8, color: u16)
        -> Result<(), Self::Error> {
        (**self).draw_string(text, x, y, size, color)
    }

    fn clear_screen(&mut self) -> Result<(), Self::Error> {
        (**self).clear_screen()
    }

    fn begin_area_write(&mut self, x0: u16, y0: u16, x1: u16, y1: u16)
        -> Result<(), Self::Error> {
        (**self).begin_area_write(x0, y0, x1, y1)
    }

    fn write_pixel_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).write_pixel_byte(byte)
    }

    fn end_write(&mut self) -> Result<(), Self::Error> {
        (**self).end_write()
    }

    fn send_command_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).send_command_byte(byte)
    }

    fn send_data_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).send_data_byte(byte)
    }
}
