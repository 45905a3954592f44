//! ILI9341 TFT driver
//!
//! Driver for 240x320 ILI9341 panels on a write-only SPI bus with a
//! data/command select line and a hardware reset line. Pixels are RGB565,
//! sent high byte first.
//!
//! # Addressed writes
//!
//! Every drawing operation opens a window with CASET/PASET, issues RAMWR and
//! then streams pixel data; the controller fills the window row by row.

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{Dimensions, OriginDimensions, Point, Size};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_9X18};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{IntoStorage, Pixel};
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;
use embedded_hal::delay::DelayNs;
use tftwire_core::{DisplayConfig, Orientation};
use tftwire_hal::{OutputPin, RenderDevice, SpiBus};

/// ILI9341 command set
pub mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLEEPOUT: u8 = 0x11;
    pub const GAMSET: u8 = 0x26;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const PASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
    pub const FRMCTR1: u8 = 0xB1;
    pub const DFC: u8 = 0xB6;
    pub const PWCTR1: u8 = 0xC0;
    pub const PWCTR2: u8 = 0xC1;
    pub const VMCTR1: u8 = 0xC5;
    pub const VMCTR2: u8 = 0xC7;
    pub const PWCTRA: u8 = 0xCB;
    pub const PWCTRB: u8 = 0xCF;
    pub const PGAMCTRL: u8 = 0xE0;
    pub const NGAMCTRL: u8 = 0xE1;
    pub const DTCTRA: u8 = 0xE8;
    pub const DTCTRB: u8 = 0xEA;
    pub const PWONSEQ: u8 = 0xED;
    pub const GAMMA3: u8 = 0xF2;
    pub const PUMPRATIO: u8 = 0xF7;
}

/// 16 bits per pixel
const PIXEL_FORMAT_RGB565: u8 = 0x55;

/// Register setup sent after the software reset, before MADCTL
const POWER_SEQUENCE: &[(u8, &[u8])] = &[
    (cmd::PWCTRA, &[0x39, 0x2C, 0x00, 0x34, 0x02]),
    (cmd::PWCTRB, &[0x00, 0xC1, 0x30]),
    (cmd::DTCTRA, &[0x85, 0x00, 0x78]),
    (cmd::DTCTRB, &[0x00, 0x00]),
    (cmd::PWONSEQ, &[0x64, 0x03, 0x12, 0x81]),
    (cmd::PUMPRATIO, &[0x20]),
    (cmd::PWCTR1, &[0x23]),
    (cmd::PWCTR2, &[0x10]),
    (cmd::VMCTR1, &[0x3E, 0x28]),
    (cmd::VMCTR2, &[0x86]),
];

/// Frame rate, scan and gamma setup sent after the pixel format
const PANEL_SEQUENCE: &[(u8, &[u8])] = &[
    (cmd::FRMCTR1, &[0x00, 0x18]),
    (cmd::DFC, &[0x08, 0x82, 0x27]),
    (cmd::GAMMA3, &[0x00]),
    (cmd::GAMSET, &[0x01]),
    (
        cmd::PGAMCTRL,
        &[
            0x0F, 0x31, 0x2B, 0x0C, 0x0E, 0x08, 0x4E, 0xF1, 0x37, 0x07, 0x10, 0x03, 0x0E, 0x09,
            0x00,
        ],
    ),
    (
        cmd::NGAMCTRL,
        &[
            0x00, 0x0E, 0x14, 0x03, 0x11, 0x07, 0x31, 0xC1, 0x48, 0x08, 0x0F, 0x0C, 0x31, 0x36,
            0x0F,
        ],
    ),
];

/// Pixels sent per SPI transfer when filling
const FILL_CHUNK_PIXELS: usize = 32;

/// Font for a protocol font size
fn font_for_size(size: u8) -> &'static MonoFont<'static> {
    match size {
        0 | 1 => &FONT_6X10,
        2 => &FONT_9X18,
        _ => &FONT_10X20,
    }
}

/// ILI9341 driver
pub struct Ili9341<SPI, DC, RST, D> {
    spi: SPI,
    /// Data/command select: low = command, high = data
    dc: DC,
    rst: RST,
    delay: D,
    orientation: Orientation,
    width: u16,
    height: u16,
}

impl<SPI, DC, RST, D> Ili9341<SPI, DC, RST, D>
where
    SPI: SpiBus,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    /// Create a driver; the panel is untouched until [`Ili9341::init`]
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: D, config: &DisplayConfig) -> Self {
        let (width, height) = config.orientation.size();
        Self {
            spi,
            dc,
            rst,
            delay,
            orientation: config.orientation,
            width,
            height,
        }
    }

    /// Reset the controller and bring the panel up, cleared to black
    pub fn init(&mut self) -> Result<(), SPI::Error> {
        self.rst.set_low();
        self.delay.delay_ms(10);
        self.rst.set_high();
        self.delay.delay_ms(500);

        self.command(cmd::SWRESET)?;
        self.delay.delay_ms(200);

        for &(command, data) in POWER_SEQUENCE {
            self.command_with_data(command, data)?;
        }
        self.command_with_data(cmd::MADCTL, &[self.orientation.madctl()])?;
        self.command_with_data(cmd::COLMOD, &[PIXEL_FORMAT_RGB565])?;
        for &(command, data) in PANEL_SEQUENCE {
            self.command_with_data(command, data)?;
        }

        self.command(cmd::SLEEPOUT)?;
        self.delay.delay_ms(120);
        self.command(cmd::DISPON)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("ILI9341 up, {}x{}", self.width, self.height);

        self.clear_screen()
    }

    /// Change the scan direction
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), SPI::Error> {
        self.command_with_data(cmd::MADCTL, &[orientation.madctl()])?;
        self.orientation = orientation;
        (self.width, self.height) = orientation.size();
        Ok(())
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Give back the bus and pins
    pub fn release(self) -> (SPI, DC, RST, D) {
        (self.spi, self.dc, self.rst, self.delay)
    }

    fn command(&mut self, command: u8) -> Result<(), SPI::Error> {
        self.spi.flush()?;
        self.dc.set_low();
        self.spi.write(&[command])
    }

    fn data(&mut self, data: &[u8]) -> Result<(), SPI::Error> {
        self.spi.flush()?;
        self.dc.set_high();
        self.spi.write(data)
    }

    fn command_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), SPI::Error> {
        self.command(command)?;
        if !data.is_empty() {
            self.data(data)?;
        }
        Ok(())
    }

    /// Clamp inclusive corners to the panel, ordering them top-left first
    fn clip(&self, x0: u16, y0: u16, x1: u16, y1: u16) -> (u16, u16, u16, u16) {
        let (x0, x1) = if x0 > x1 { (x1, x0) } else { (x0, x1) };
        let (y0, y1) = if y0 > y1 { (y1, y0) } else { (y0, y1) };
        let max_x = self.width - 1;
        let max_y = self.height - 1;
        (x0.min(max_x), y0.min(max_y), x1.min(max_x), y1.min(max_y))
    }

    /// Address a window and start a memory write; leaves DC in data mode
    fn open_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), SPI::Error> {
        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();

        self.command_with_data(cmd::CASET, &[x0h, x0l, x1h, x1l])?;
        self.command_with_data(cmd::PASET, &[y0h, y0l, y1h, y1l])?;
        self.command(cmd::RAMWR)?;
        self.spi.flush()?;
        self.dc.set_high();
        Ok(())
    }

    /// Send `count` pixels of one colour into the open window
    fn repeat_color(&mut self, color: u16, mut count: u32) -> Result<(), SPI::Error> {
        let [hi, lo] = color.to_be_bytes();
        let mut chunk = [0u8; FILL_CHUNK_PIXELS * 2];
        for pair in chunk.chunks_exact_mut(2) {
            pair[0] = hi;
            pair[1] = lo;
        }

        while count > 0 {
            let pixels = count.min(FILL_CHUNK_PIXELS as u32);
            self.spi.write(&chunk[..pixels as usize * 2])?;
            count -= pixels;
        }
        Ok(())
    }
}

impl<SPI, DC, RST, D> RenderDevice for Ili9341<SPI, DC, RST, D>
where
    SPI: SpiBus,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    type Error = SPI::Error;

    fn fill_area(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: u16,
    ) -> Result<(), SPI::Error> {
        let (x0, y0, x1, y1) = self.clip(x0, y0, x1, y1);
        self.open_window(x0, y0, x1, y1)?;

        let pixels = u32::from(x1 - x0 + 1) * u32::from(y1 - y0 + 1);
        self.repeat_color(color, pixels)?;
        self.spi.flush()
    }

    fn draw_string(
        &mut self,
        text: &str,
        x: u16,
        y: u16,
        size: u8,
        color: u16,
    ) -> Result<(), SPI::Error> {
        let style = MonoTextStyle::new(font_for_size(size), Rgb565::from(RawU16::new(color)));
        let origin = Point::new(i32::from(x), i32::from(y));
        Text::with_baseline(text, origin, style, Baseline::Top).draw(self)?;
        self.spi.flush()
    }

    fn clear_screen(&mut self) -> Result<(), SPI::Error> {
        self.fill_area(0, 0, self.width - 1, self.height - 1, 0x0000)
    }

    fn begin_area_write(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), SPI::Error> {
        let (x0, y0, x1, y1) = self.clip(x0, y0, x1, y1);
        self.open_window(x0, y0, x1, y1)
    }

    fn write_pixel_byte(&mut self, byte: u8) -> Result<(), SPI::Error> {
        self.spi.write_byte(byte)
    }

    fn end_write(&mut self) -> Result<(), SPI::Error> {
        self.spi.flush()
    }

    fn send_command_byte(&mut self, byte: u8) -> Result<(), SPI::Error> {
        self.command(byte)
    }

    fn send_data_byte(&mut self, byte: u8) -> Result<(), SPI::Error> {
        self.data(&[byte])
    }
}

impl<SPI, DC, RST, D> OriginDimensions for Ili9341<SPI, DC, RST, D> {
    fn size(&self) -> Size {
        Size::new(u32::from(self.width), u32::from(self.height))
    }
}

impl<SPI, DC, RST, D> DrawTarget for Ili9341<SPI, DC, RST, D>
where
    SPI: SpiBus,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    type Color = Rgb565;
    type Error = SPI::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), SPI::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
                continue;
            };
            if x >= self.width || y >= self.height {
                continue;
            }
            self.open_window(x, y, x, y)?;
            self.spi.write(&color.into_storage().to_be_bytes())?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), SPI::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        // Intersection with the panel keeps both corners non-negative
        self.fill_area(
            area.top_left.x as u16,
            area.top_left.y as u16,
            bottom_right.x as u16,
            bottom_right.y as u16,
            color.into_storage(),
        )
    }
}
