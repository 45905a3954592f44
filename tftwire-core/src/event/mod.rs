//! Deferred-work scheduler
//!
//! Interrupt handlers cannot do real work; they [`EventLoop::schedule`] an
//! event instead, and the foreground [`EventLoop::run`] loop invokes the
//! bound callback later. Events fire in the order they were scheduled, at
//! most once per request.
//!
//! Events are allocated once at startup, one per interrupt source, and never
//! freed. Every queue mutation (schedule, cancel, the pop in the run loop)
//! happens inside a critical section, so any context may call in; callbacks
//! themselves run outside it.

mod queue;

pub use queue::EventQueue;

use core::cell::RefCell;
use core::num::NonZeroU16;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::{AtomicBool, Ordering};

/// Deferred callback: receives the foreground context and the index bound at
/// allocation
pub type Callback<C> = fn(&mut C, u16);

/// Opaque reference to an allocated event
///
/// Handle 0 is never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventHandle(NonZeroU16);

impl EventHandle {
    /// Rebuild a handle from [`EventHandle::raw`]
    ///
    /// Returns `None` for the reserved value 0.
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match NonZeroU16::new(raw) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    /// Numeric value, for storing in an atomic
    pub const fn raw(self) -> u16 {
        self.0.get()
    }

    fn slot(self) -> u16 {
        self.0.get() - 1
    }
}

/// Callback binding for one allocated event
struct Slot<C> {
    callback: Callback<C>,
    index: u16,
}

// Manual impls: a fn pointer is Copy whatever `C` is
impl<C> Clone for Slot<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Slot<C> {}

struct Inner<C, const N: usize> {
    slots: [Option<Slot<C>>; N],
    queue: EventQueue<N>,
    allocated: u16,
}

impl<C, const N: usize> Inner<C, N> {
    /// Validate a handle against the arena, returning its slot index
    fn slot(&self, handle: EventHandle) -> u16 {
        let slot = handle.slot();
        assert!(
            slot < self.allocated,
            "event handle {} was never allocated",
            handle.raw()
        );
        slot
    }
}

/// Fixed pool of `N` deferred events dispatched to a context of type `C`
pub struct EventLoop<C, const N: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner<C, N>>>,
    terminate: AtomicBool,
}

impl<C, const N: usize> Default for EventLoop<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, const N: usize> EventLoop<C, N> {
    /// Create an empty pool
    pub const fn new() -> Self {
        assert!(N < u16::MAX as usize, "event pool too large");
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                slots: [None; N],
                queue: EventQueue::new(),
                allocated: 0,
            })),
            terminate: AtomicBool::new(false),
        }
    }

    /// Bind `callback` and `index` to the next free event
    ///
    /// # Panics
    /// If all `N` events are already allocated.
    pub fn allocate(&self, callback: Callback<C>, index: u16) -> EventHandle {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let slot = inner.allocated;
            assert!((slot as usize) < N, "event pool exhausted ({} events)", N);

            inner.slots[slot as usize] = Some(Slot { callback, index });
            inner.allocated += 1;
            EventHandle(NonZeroU16::MIN.saturating_add(slot))
        })
    }

    /// Request that the event's callback run once from [`EventLoop::run`]
    ///
    /// Scheduling an event that is already pending does nothing; it keeps its
    /// place in the queue. Safe to call from interrupt context.
    ///
    /// # Panics
    /// If `handle` was not allocated from this pool.
    pub fn schedule(&self, handle: EventHandle) {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let slot = inner.slot(handle);
            inner.queue.push_back(slot);
        });
    }

    /// Withdraw a pending event
    ///
    /// Does nothing if the event is not pending.
    ///
    /// # Panics
    /// If `handle` was not allocated from this pool.
    pub fn cancel(&self, handle: EventHandle) {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let slot = inner.slot(handle);
            inner.queue.remove(slot);
        });
    }

    /// Whether the event is waiting to run
    pub fn is_scheduled(&self, handle: EventHandle) -> bool {
        self.inner.lock(|inner| {
            let inner = inner.borrow();
            let slot = inner.slot(handle);
            inner.queue.contains(slot)
        })
    }

    /// Number of events waiting to run
    pub fn pending(&self) -> usize {
        self.inner.lock(|inner| inner.borrow().queue.len())
    }

    /// Number of events handed out so far
    pub fn allocated(&self) -> usize {
        self.inner.lock(|inner| inner.borrow().allocated as usize)
    }

    /// Pop the oldest pending event and run its callback
    ///
    /// Returns false if nothing was pending.
    pub fn dispatch_one(&self, ctx: &mut C) -> bool {
        let popped = self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let slot = inner.queue.pop_front()?;
            inner.slots[slot as usize]
        });

        match popped {
            Some(Slot { callback, index }) => {
                callback(ctx, index);
                true
            }
            None => false,
        }
    }

    /// Run callbacks until nothing is pending
    ///
    /// Events scheduled by the callbacks themselves are run too. Returns the
    /// number of callbacks invoked.
    pub fn run_pending(&self, ctx: &mut C) -> usize {
        let mut count = 0;
        while self.dispatch_one(ctx) {
            count += 1;
        }
        count
    }

    /// Foreground loop
    ///
    /// Busy-polls the queue and never returns, unless [`EventLoop::terminate`]
    /// has been called, in which case every call performs one iteration.
    pub fn run(&self, ctx: &mut C) {
        loop {
            self.dispatch_one(ctx);
            if self.terminate.load(Ordering::Acquire) {
                return;
            }
        }
    }

    /// Make [`EventLoop::run`] return after each iteration
    pub fn terminate(&self) {
        self.terminate.store(true, Ordering::Release);
    }
}
