//! Interrupt-fed serial receive buffer
//!
//! The receive interrupt hands each byte to [`SerialPort::on_receive`], which
//! stores it and schedules the registered data-available event. The
//! foreground drains the buffer through [`SerialRx`] from that event's
//! callback. Bytes arriving while the buffer is full are dropped and counted.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::{AtomicU16, AtomicU32, Ordering};
use tftwire_hal::SerialRx;

use crate::event::{EventHandle, EventLoop};
use crate::ringbuf::RingBuffer;

/// Serial receive path with an `N`-byte buffer
///
/// Shared between interrupt and foreground, so every method takes `&self`.
pub struct SerialPort<const N: usize> {
    rx: Mutex<CriticalSectionRawMutex, RefCell<RingBuffer<[u8; N]>>>,
    /// Raw data-available handle, 0 while closed
    data_event: AtomicU16,
    overruns: AtomicU32,
}

impl<const N: usize> Default for SerialPort<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SerialPort<N> {
    /// Create a closed port
    pub const fn new() -> Self {
        Self {
            rx: Mutex::new(RefCell::new(RingBuffer::new([0; N]))),
            data_event: AtomicU16::new(0),
            overruns: AtomicU32::new(0),
        }
    }

    /// Start accepting bytes, scheduling `data_event` whenever one arrives
    pub fn open(&self, data_event: EventHandle) {
        self.rx.lock(|rx| rx.borrow_mut().flush());
        self.data_event.store(data_event.raw(), Ordering::Release);
    }

    /// Stop accepting bytes and discard anything buffered
    pub fn close(&self) {
        self.data_event.store(0, Ordering::Release);
        self.rx.lock(|rx| rx.borrow_mut().flush());
    }

    pub fn is_open(&self) -> bool {
        self.data_event.load(Ordering::Acquire) != 0
    }

    /// Store a received byte; call from the receive interrupt
    ///
    /// Ignored while the port is closed.
    pub fn on_receive<C, const M: usize>(&self, byte: u8, events: &EventLoop<C, M>) {
        self.on_receive_slice(&[byte], events);
    }

    /// Store a burst of received bytes (for example a drained hardware FIFO)
    pub fn on_receive_slice<C, const M: usize>(&self, bytes: &[u8], events: &EventLoop<C, M>) {
        let Some(event) = EventHandle::from_raw(self.data_event.load(Ordering::Acquire)) else {
            return;
        };

        let stored = self.rx.lock(|rx| rx.borrow_mut().write(bytes));
        if stored < bytes.len() {
            let dropped = (bytes.len() - stored) as u32;
            self.overruns.fetch_add(dropped, Ordering::Relaxed);
        }
        events.schedule(event);
    }

    /// Move up to `buf.len()` buffered bytes into `buf`, never blocking
    pub fn read(&self, buf: &mut [u8]) -> usize {
        self.rx.lock(|rx| rx.borrow_mut().read(buf))
    }

    /// Number of buffered bytes
    pub fn available(&self) -> usize {
        self.rx.lock(|rx| rx.borrow().used())
    }

    /// Bytes dropped because the buffer was full
    pub fn overruns(&self) -> u32 {
        self.overruns.load(Ordering::Relaxed)
    }
}

impl<const N: usize> SerialRx for &SerialPort<N> {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        SerialPort::read(*self, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx;

    fn noop(_: &mut Ctx, _: u16) {}

    #[test]
    fn test_receive_schedules_event() {
        let events = EventLoop::<Ctx, 2>::new();
        let port = SerialPort::<8>::new();
        let handle = events.allocate(noop, 0);
        port.open(handle);

        port.on_receive(0x41, &events);
        port.on_receive(0x42, &events);

        // Several bytes, one pending event
        assert_eq!(events.pending(), 1);
        assert_eq!(port.available(), 2);

        let mut buf = [0u8; 4];
        assert_eq!(port.read(&mut buf), 2);
        assert_eq!(&buf[..2], b"AB");
        assert_eq!(port.read(&mut buf), 0);
    }

    #[test]
    fn test_closed_port_ignores_bytes() {
        let events = EventLoop::<Ctx, 1>::new();
        let port = SerialPort::<8>::new();
        assert!(!port.is_open());

        port.on_receive(1, &events);
        assert_eq!(port.available(), 0);
        assert_eq!(events.pending(), 0);

        let handle = events.allocate(noop, 0);
        port.open(handle);
        port.on_receive(1, &events);
        port.close();
        assert_eq!(port.available(), 0);
        port.on_receive(2, &events);
        assert_eq!(port.available(), 0);
    }

    #[test]
    fn test_overrun_counted() {
        let events = EventLoop::<Ctx, 1>::new();
        let port = SerialPort::<4>::new();
        port.open(events.allocate(noop, 0));

        port.on_receive_slice(&[1, 2, 3], &events);
        port.on_receive_slice(&[4, 5, 6], &events);
        assert_eq!(port.available(), 4);
        assert_eq!(port.overruns(), 2);

        // Oldest bytes kept
        let mut buf = [0u8; 4];
        port.read(&mut buf);
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn test_serial_rx_trait() {
        let events = EventLoop::<Ctx, 1>::new();
        let port = SerialPort::<4>::new();
        port.open(events.allocate(noop, 0));
        port.on_receive(9, &events);

        let mut rx = &port;
        assert_eq!(rx.read_byte(), Some(9));
        assert_eq!(rx.read_byte(), None);
    }
}
