//! Serial-to-display wiring
//!
//! [`DisplayLink`] owns the receive side, the render device and the command
//! parser. Its [`DisplayLink::poll`] is meant to be called from the
//! data-available event callback: it drains every pending byte and feeds the
//! parser one byte at a time.

use tftwire_hal::{RenderDevice, SerialRx};
use tftwire_protocol::{CommandId, FrameError};

use crate::config::LinkConfig;
use crate::event::{Callback, EventHandle, EventLoop};
use crate::parser::CommandParser;

/// Bytes pulled from the serial port per read
const READ_CHUNK: usize = 32;

/// Link counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Bytes taken from the serial port
    pub bytes: u32,
    /// Frames executed
    pub frames: u32,
    /// Frames dropped for framing or length errors
    pub dropped: u32,
    /// Frames whose device calls failed
    pub device_faults: u32,
}

/// Serial receive, parser and render device bundled together
pub struct DisplayLink<S, R> {
    serial: S,
    device: R,
    parser: CommandParser,
    stats: LinkStats,
    event: Option<EventHandle>,
    running: bool,
}

impl<S: SerialRx, R: RenderDevice> DisplayLink<S, R> {
    pub fn new(serial: S, device: R, config: &LinkConfig) -> Self {
        Self {
            serial,
            device,
            parser: CommandParser::new(config.etx_policy),
            stats: LinkStats::default(),
            event: None,
            running: false,
        }
    }

    /// Start draining the serial port
    ///
    /// The data-available event is allocated on the first call and reused
    /// afterwards. `callback` must end up calling [`DisplayLink::poll`] on
    /// this link. The returned handle is what the receive interrupt should
    /// schedule.
    pub fn start<C, const N: usize>(
        &mut self,
        events: &EventLoop<C, N>,
        callback: Callback<C>,
    ) -> EventHandle {
        let handle = match self.event {
            Some(handle) => handle,
            None => {
                let handle = events.allocate(callback, 0);
                self.event = Some(handle);
                handle
            }
        };
        if !self.running {
            self.parser.reset();
            self.running = true;
        }

        #[cfg(feature = "defmt")]
        defmt::info!("display link started, event {}", handle);

        handle
    }

    /// Stop draining the serial port
    ///
    /// A pending data-available event is withdrawn and any half-received
    /// frame is dropped. The event stays allocated.
    pub fn stop<C, const N: usize>(&mut self, events: &EventLoop<C, N>) {
        if let Some(handle) = self.event {
            events.cancel(handle);
        }
        self.parser.reset();
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Data-available handling: feed every pending byte to the parser
    ///
    /// Returns the number of bytes consumed.
    pub fn poll(&mut self) -> usize {
        if !self.running {
            return 0;
        }

        let mut total = 0;
        let mut buf = [0u8; READ_CHUNK];
        loop {
            let n = self.serial.read(&mut buf);
            if n == 0 {
                break;
            }
            for &byte in &buf[..n] {
                let _ = self.feed(byte);
            }
            total += n;
        }
        total
    }

    /// Feed one byte to the parser and account for the outcome
    pub fn feed(&mut self, byte: u8) -> Result<Option<CommandId>, FrameError> {
        self.stats.bytes = self.stats.bytes.wrapping_add(1);
        let result = self.parser.process(byte, &mut self.device);

        match result {
            Ok(Some(_command)) => {
                self.stats.frames = self.stats.frames.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::trace!("frame {} done", _command);
            }
            Ok(None) => {}
            Err(FrameError::Device) => {
                self.stats.device_faults = self.stats.device_faults.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("render device fault");
            }
            Err(_e) => {
                self.stats.dropped = self.stats.dropped.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::debug!("frame dropped: {}", _e);
            }
        }
        result
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    pub fn device(&self) -> &R {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut R {
        &mut self.device
    }

    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }
}
