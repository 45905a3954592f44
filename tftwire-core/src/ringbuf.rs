//! Bounded byte FIFO
//!
//! [`RingBuffer`] keeps only indices; the bytes live in whatever storage the
//! owner hands it (an array embedded in the owner, or a borrowed slice).
//! Indices wrap modulo the storage length, so the full capacity is usable.

/// Fixed-capacity byte FIFO over caller-provided storage
#[derive(Debug, Clone)]
pub struct RingBuffer<S> {
    storage: S,
    /// Index of the oldest byte
    read: usize,
    /// Number of bytes held
    used: usize,
}

impl<S> RingBuffer<S> {
    /// Create an empty buffer over `storage`
    pub const fn new(storage: S) -> Self {
        Self {
            storage,
            read: 0,
            used: 0,
        }
    }
}

impl<const N: usize> Default for RingBuffer<[u8; N]> {
    fn default() -> Self {
        Self::new([0; N])
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> RingBuffer<S> {
    /// Total number of bytes the buffer can hold
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().len()
    }

    /// Number of bytes currently held
    pub fn used(&self) -> usize {
        self.used
    }

    /// Number of bytes that can still be pushed
    pub fn free(&self) -> usize {
        self.capacity() - self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    pub fn is_full(&self) -> bool {
        self.used == self.capacity()
    }

    /// Discard all contents
    ///
    /// Storage bytes are left as they are; only the indices are reset.
    pub fn flush(&mut self) {
        self.read = 0;
        self.used = 0;
    }

    /// Append one byte
    ///
    /// A full buffer hands the byte back unchanged.
    pub fn push(&mut self, byte: u8) -> Result<(), u8> {
        let capacity = self.capacity();
        if self.used == capacity {
            return Err(byte);
        }
        let write = (self.read + self.used) % capacity;
        self.storage.as_mut()[write] = byte;
        self.used += 1;
        Ok(())
    }

    /// Remove the oldest byte
    pub fn pop(&mut self) -> Option<u8> {
        if self.used == 0 {
            return None;
        }
        let byte = self.storage.as_ref()[self.read];
        self.read = (self.read + 1) % self.capacity();
        self.used -= 1;
        Some(byte)
    }

    /// Look at the oldest byte without removing it
    pub fn peek(&self) -> Option<u8> {
        if self.used == 0 {
            None
        } else {
            Some(self.storage.as_ref()[self.read])
        }
    }

    /// Append as many bytes of `data` as fit
    ///
    /// Returns how many were written. Bytes beyond the free space are
    /// dropped; nothing already buffered is overwritten.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let capacity = self.capacity();
        let count = data.len().min(self.free());
        let write = (self.read + self.used) % capacity.max(1);

        // At most two copies: up to the end of storage, then from the start
        let first = count.min(capacity - write);
        let storage = self.storage.as_mut();
        storage[write..write + first].copy_from_slice(&data[..first]);
        storage[..count - first].copy_from_slice(&data[first..count]);

        self.used += count;
        count
    }

    /// Move up to `buf.len()` of the oldest bytes into `buf`
    ///
    /// Returns how many were moved.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let capacity = self.capacity();
        let count = buf.len().min(self.used);

        let first = count.min(capacity - self.read);
        let storage = self.storage.as_ref();
        buf[..first].copy_from_slice(&storage[self.read..self.read + first]);
        buf[first..count].copy_from_slice(&storage[..count - first]);

        if count > 0 {
            self.read = (self.read + count) % capacity;
        }
        self.used -= count;
        count
    }

    /// Rearrange storage so the contents are one slice, oldest byte first
    pub fn make_contiguous(&mut self) -> &[u8] {
        if self.read + self.used > self.capacity() {
            let read = self.read;
            self.storage.as_mut().rotate_left(read);
            self.read = 0;
        }
        &self.storage.as_ref()[self.read..self.read + self.used]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_pop_fifo() {
        let mut rb = RingBuffer::new([0u8; 4]);
        assert!(rb.is_empty());
        assert_eq!(rb.capacity(), 4);

        rb.push(1).unwrap();
        rb.push(2).unwrap();
        rb.push(3).unwrap();
        assert_eq!(rb.used(), 3);
        assert_eq!(rb.free(), 1);

        assert_eq!(rb.pop(), Some(1));
        assert_eq!(rb.pop(), Some(2));
        assert_eq!(rb.pop(), Some(3));
        assert_eq!(rb.pop(), None);
    }

    #[test]
    fn test_push_full_returns_byte() {
        let mut rb = RingBuffer::new([0u8; 2]);
        rb.push(0xAA).unwrap();
        rb.push(0xBB).unwrap();
        assert!(rb.is_full());
        assert_eq!(rb.push(0xCC), Err(0xCC));

        // Oldest data is intact
        assert_eq!(rb.pop(), Some(0xAA));
        assert_eq!(rb.pop(), Some(0xBB));
    }

    #[test]
    fn test_write_truncates() {
        let mut rb = RingBuffer::new([0u8; 4]);
        rb.push(9).unwrap();
        assert_eq!(rb.write(&[1, 2, 3, 4, 5]), 3);
        assert!(rb.is_full());
        assert_eq!(rb.write(&[6]), 0);

        let mut out = [0u8; 8];
        assert_eq!(rb.read(&mut out), 4);
        assert_eq!(&out[..4], &[9, 1, 2, 3]);
    }

    #[test]
    fn test_write_read_across_wrap() {
        let mut rb = RingBuffer::new([0u8; 5]);
        let mut out = [0u8; 5];

        assert_eq!(rb.write(&[1, 2, 3]), 3);
        assert_eq!(rb.read(&mut out[..2]), 2);
        // Read index now 2, write wraps past the end
        assert_eq!(rb.write(&[4, 5, 6, 7]), 4);
        assert_eq!(rb.used(), 5);
        assert_eq!(rb.read(&mut out), 5);
        assert_eq!(out, [3, 4, 5, 6, 7]);
        assert!(rb.is_empty());
    }

    #[test]
    fn test_flush_is_idempotent() {
        let mut rb = RingBuffer::new([0u8; 3]);
        rb.flush();
        assert_eq!(rb.used(), 0);

        rb.write(&[1, 2]);
        rb.flush();
        rb.flush();
        assert_eq!(rb.used(), 0);
        assert_eq!(rb.capacity(), 3);
        assert_eq!(rb.pop(), None);
    }

    #[test]
    fn test_make_contiguous() {
        let mut rb = RingBuffer::new([0u8; 4]);
        rb.write(&[1, 2, 3]);
        rb.pop();
        rb.pop();
        rb.write(&[4, 5, 6]);

        assert_eq!(rb.make_contiguous(), &[3, 4, 5, 6]);
        assert_eq!(rb.pop(), Some(3));
        rb.push(7).unwrap();
        assert_eq!(rb.make_contiguous(), &[4, 5, 6, 7]);
    }

    #[test]
    fn test_borrowed_storage() {
        let mut storage = [0u8; 3];
        let mut rb = RingBuffer::new(&mut storage[..]);
        rb.write(b"abc");
        assert_eq!(rb.peek(), Some(b'a'));
        assert_eq!(rb.make_contiguous(), b"abc");
    }

    proptest! {
        #[test]
        fn test_fifo_order_over_many_wraps(
            chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..=7), 1..40)
        ) {
            let mut rb = RingBuffer::new([0u8; 7]);
            let mut out = [0u8; 7];

            for chunk in chunks {
                prop_assert_eq!(rb.write(&chunk), chunk.len());
                let n = rb.read(&mut out);
                prop_assert_eq!(n, chunk.len());
                prop_assert_eq!(&out[..n], &chunk[..]);
                prop_assert_eq!(rb.used(), 0);
            }
        }
    }
}
