//! FIFO of event slots
//!
//! A doubly linked list threaded through a fixed array of links, one per
//! slot. The queue owns only ordering; callbacks live in the arena next to
//! it. Insertion and removal are O(1) given a slot index.

/// Queue links for one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Link {
    prev: Option<u16>,
    next: Option<u16>,
    queued: bool,
}

impl Link {
    const UNLINKED: Self = Self {
        prev: None,
        next: None,
        queued: false,
    };
}

/// Intrusive FIFO over `N` slots
///
/// Every slot is either queued exactly once or unlinked (no neighbours).
#[derive(Debug, Clone)]
pub struct EventQueue<const N: usize> {
    links: [Link; N],
    head: Option<u16>,
    tail: Option<u16>,
    len: usize,
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            links: [Link::UNLINKED; N],
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of queued slots
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `slot` is currently queued
    pub fn contains(&self, slot: u16) -> bool {
        self.links[slot as usize].queued
    }

    /// Append `slot` at the tail
    ///
    /// Returns false, leaving the queue untouched, if it is already queued.
    pub fn push_back(&mut self, slot: u16) -> bool {
        if self.links[slot as usize].queued {
            return false;
        }

        self.links[slot as usize] = Link {
            prev: self.tail,
            next: None,
            queued: true,
        };
        match self.tail {
            Some(tail) => self.links[tail as usize].next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
        true
    }

    /// Detach and return the head slot
    pub fn pop_front(&mut self) -> Option<u16> {
        let head = self.head?;
        self.remove(head);
        Some(head)
    }

    /// Unlink `slot` wherever it sits
    ///
    /// Returns false if it was not queued.
    pub fn remove(&mut self, slot: u16) -> bool {
        let link = self.links[slot as usize];
        if !link.queued {
            return false;
        }

        match link.prev {
            Some(prev) => self.links[prev as usize].next = link.next,
            None => self.head = link.next,
        }
        match link.next {
            Some(next) => self.links[next as usize].prev = link.prev,
            None => self.tail = link.prev,
        }
        self.links[slot as usize] = Link::UNLINKED;
        self.len -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<const N: usize>(queue: &mut EventQueue<N>) -> heapless::Vec<u16, N> {
        let mut out = heapless::Vec::new();
        while let Some(slot) = queue.pop_front() {
            out.push(slot).unwrap();
        }
        out
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = EventQueue::<4>::new();
        assert!(queue.push_back(2));
        assert!(queue.push_back(0));
        assert!(queue.push_back(3));
        assert_eq!(queue.len(), 3);

        assert_eq!(&drain(&mut queue)[..], &[2, 0, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_twice_keeps_position() {
        let mut queue = EventQueue::<4>::new();
        queue.push_back(1);
        queue.push_back(2);
        assert!(!queue.push_back(1));
        assert_eq!(queue.len(), 2);
        assert_eq!(&drain(&mut queue)[..], &[1, 2]);
    }

    #[test]
    fn test_remove_head_middle_tail() {
        let mut queue = EventQueue::<5>::new();
        for slot in 0..5 {
            queue.push_back(slot);
        }

        assert!(queue.remove(0));
        assert!(queue.remove(2));
        assert!(queue.remove(4));
        assert!(!queue.remove(4));
        assert!(!queue.contains(2));
        assert_eq!(&drain(&mut queue)[..], &[1, 3]);
    }

    #[test]
    fn test_remove_only_element() {
        let mut queue = EventQueue::<2>::new();
        queue.push_back(1);
        assert!(queue.remove(1));
        assert!(queue.is_empty());
        assert_eq!(queue.pop_front(), None);

        // Queue is usable again after becoming empty
        queue.push_back(0);
        assert_eq!(queue.pop_front(), Some(0));
    }

    #[test]
    fn test_unqueued_links_are_cleared() {
        let mut queue = EventQueue::<3>::new();
        queue.push_back(0);
        queue.push_back(1);
        queue.pop_front();
        assert_eq!(queue.links[0], Link::UNLINKED);
        assert_eq!(queue.links[1].prev, None);
    }
}
