//! Configuration types
//!
//! Board-agnostic link and panel settings. The firmware fills these from its
//! build-time board description.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default serial receive buffer size in bytes
pub const RX_BUFFER_SIZE: usize = 4096;

/// Default parser scratch buffer size in bytes
pub const SCRATCH_SIZE: usize = 512;

/// Default number of schedulable events
pub const EVENT_POOL_SIZE: usize = 8;

/// Panel width in portrait orientation
pub const PANEL_WIDTH: u16 = 240;

/// Panel height in portrait orientation
pub const PANEL_HEIGHT: u16 = 320;

/// What to do with the byte in the ETX position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EtxPolicy {
    /// Any byte closes the frame
    #[default]
    Lenient,
    /// Only ETX closes the frame cleanly; anything else is reported
    Strict,
}

/// Panel orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    #[default]
    Portrait,
    PortraitInverted,
    Landscape,
    LandscapeInverted,
}

impl Orientation {
    /// Memory access control (MADCTL) register value, BGR order
    pub const fn madctl(self) -> u8 {
        match self {
            Orientation::Portrait => 0x48,
            Orientation::PortraitInverted => 0x88,
            Orientation::Landscape => 0xE8,
            Orientation::LandscapeInverted => 0x28,
        }
    }

    pub const fn is_landscape(self) -> bool {
        matches!(
            self,
            Orientation::Landscape | Orientation::LandscapeInverted
        )
    }

    /// Visible (width, height) in this orientation
    pub const fn size(self) -> (u16, u16) {
        if self.is_landscape() {
            (PANEL_HEIGHT, PANEL_WIDTH)
        } else {
            (PANEL_WIDTH, PANEL_HEIGHT)
        }
    }
}

/// Serial link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// ETX validation
    pub etx_policy: EtxPolicy,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baudrate: 460_800,
            etx_policy: EtxPolicy::Lenient,
        }
    }
}

/// Panel settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// SPI clock in Hz
    pub spi_frequency_hz: u32,
    pub orientation: Orientation,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            spi_frequency_hz: 25_000_000,
            orientation: Orientation::Portrait,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let link = LinkConfig::default();
        assert_eq!(link.baudrate, 460_800);
        assert_eq!(link.etx_policy, EtxPolicy::Lenient);

        let display = DisplayConfig::default();
        assert_eq!(display.spi_frequency_hz, 25_000_000);
        assert_eq!(display.orientation, Orientation::Portrait);
    }

    #[test]
    fn test_orientation_madctl_and_size() {
        assert_eq!(Orientation::Portrait.madctl(), 0x48);
        assert_eq!(Orientation::PortraitInverted.madctl(), 0x88);
        assert_eq!(Orientation::Landscape.madctl(), 0xE8);
        assert_eq!(Orientation::LandscapeInverted.madctl(), 0x28);

        assert_eq!(Orientation::Portrait.size(), (240, 320));
        assert_eq!(Orientation::LandscapeInverted.size(), (320, 240));
    }
}
