//! UART serial communication abstractions
//!
//! The receive side is a non-blocking drain: the interrupt handler fills a
//! driver-owned buffer and the foreground takes whatever has arrived.

/// UART receiver
pub trait SerialRx {
    /// Copy up to `buf.len()` received bytes into `buf`
    ///
    /// Never blocks. Returns the number of bytes copied, which is zero when
    /// nothing is pending.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Take a single received byte, if one is pending
    fn read_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.read(&mut buf) {
            0 => None,
            _ => Some(buf[0]),
        }
    }
}

impl<T: SerialRx + ?Sized> SerialRx for &mut T {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        (**self).read(buf)
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 460_800,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted<'a> {
        data: &'a [u8],
    }

    impl SerialRx for Scripted<'_> {
        fn read(&mut self, buf: &mut [u8]) -> usize {
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            n
        }
    }

    #[test]
    fn test_read_byte_drains_in_order() {
        let mut rx = Scripted { data: &[0x02, 0x03] };

        assert_eq!(rx.read_byte(), Some(0x02));
        assert_eq!(rx.read_byte(), Some(0x03));
        assert_eq!(rx.read_byte(), None);
    }

    #[test]
    fn test_default_config_matches_link_speed() {
        let config = UartConfig::default();
        assert_eq!(config.baudrate, 460_800);
        assert_eq!(config.parity, Parity::None);
    }
}
