//! Bounded frame queue shared between the CAN receive interrupt (producer)
//! and the main loop (consumer).
//!
//! The ring state (`head`, `tail`, `full`) is the only data touched by both
//! execution contexts. Every accessor performs its whole read-modify-write
//! inside one [`embassy_sync::blocking_mutex::Mutex::lock`] call. With
//! [`CriticalSectionRawMutex`] that call masks interrupts for the closure body
//! only, and the previous state is restored on every exit path. Closure
//! bodies copy a frame and move indices; nothing else runs under the lock.
//!
//! Overflow policy: when the ring is full the *newest* frame is refused and
//! counted; buffered frames are never overwritten.
//!
//! ```
//! use can_monitor::infra::queue::FrameQueue;
//! use can_monitor::protocol::transport::{can_frame::CanFrame, can_id::CanId};
//! use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//!
//! let queue: FrameQueue<NoopRawMutex, 4> = FrameQueue::new();
//! let frame = CanFrame::with_data(CanId::Standard(0x303), &[0xDE, 0xAD]).unwrap();
//! assert!(queue.enqueue(frame));
//! assert_eq!(queue.try_dequeue(), Some(frame));
//! assert!(queue.is_empty());
//! ```
//!
//! [`CriticalSectionRawMutex`]: embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex
use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;

use crate::core::QUEUE_CAPACITY;
use crate::protocol::transport::can_frame::CanFrame;

/// Queue type used by firmware: interrupt-safe, default capacity.
pub type MonitorQueue = FrameQueue<CriticalSectionRawMutex, QUEUE_CAPACITY>;

//==================================================================================State
/// Ring storage and indices. Only ever accessed under the mutex.
struct RingState<const N: usize> {
    slots: [CanFrame; N],
    /// Next slot to write.
    head: usize,
    /// Next slot to read.
    tail: usize,
    /// Disambiguates `head == tail`: set when the last write filled the ring.
    full: bool,
    /// Frames refused because the ring was full.
    dropped: u32,
    /// Hardware error latched by the producer for the consumer to escalate.
    fault: Option<embedded_can::ErrorKind>,
}

impl<const N: usize> RingState<N> {
    const fn new() -> Self {
        Self {
            slots: [CanFrame::EMPTY; N],
            head: 0,
            tail: 0,
            full: false,
            dropped: 0,
            fault: None,
        }
    }

    /// Advance a ring index. The modulo applies to the incremented value.
    #[inline]
    const fn advance(index: usize) -> usize {
        (index + 1) % N
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.head == self.tail && !self.full
    }

    #[inline]
    fn len(&self) -> usize {
        if self.full {
            N
        } else {
            (self.head + N - self.tail) % N
        }
    }

    fn push(&mut self, frame: CanFrame) -> bool {
        if self.full {
            self.dropped = self.dropped.saturating_add(1);
            return false;
        }
        self.slots[self.head] = frame;
        self.head = Self::advance(self.head);
        self.full = self.head == self.tail;
        true
    }

    fn pop(&mut self) -> Option<CanFrame> {
        if self.is_empty() {
            return None;
        }
        let frame = self.slots[self.tail];
        self.tail = Self::advance(self.tail);
        self.full = false;
        Some(frame)
    }
}

//==================================================================================FrameQueue
/// Fixed-capacity single-producer/single-consumer frame queue.
///
/// `M` selects the locking strategy: [`CriticalSectionRawMutex`] whenever an
/// interrupt handler is involved, `NoopRawMutex` for single-context use.
/// `new` is `const`, so the queue can live in a `static`.
pub struct FrameQueue<M: RawMutex, const N: usize> {
    state: Mutex<M, RefCell<RingState<N>>>,
}

impl<M: RawMutex, const N: usize> Default for FrameQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize> FrameQueue<M, N> {
    const NON_EMPTY: () = assert!(N > 0, "FrameQueue capacity must be at least 1");

    /// Create an empty queue.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::NON_EMPTY;
        Self {
            state: Mutex::new(RefCell::new(RingState::new())),
        }
    }

    #[inline]
    fn with_state<R>(&self, f: impl FnOnce(&mut RingState<N>) -> R) -> R {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Offer a frame (producer side).
    ///
    /// Returns `false` and discards `frame` when the queue is full; frames
    /// already buffered stay untouched and in order.
    pub fn enqueue(&self, frame: CanFrame) -> bool {
        self.with_state(|state| state.push(frame))
    }

    /// Take the oldest unread frame (consumer side).
    pub fn try_dequeue(&self) -> Option<CanFrame> {
        self.with_state(|state| state.pop())
    }

    /// `true` when no unread frame is stored.
    pub fn is_empty(&self) -> bool {
        self.with_state(|state| state.is_empty())
    }

    /// `true` when the next `enqueue` would be refused.
    pub fn is_full(&self) -> bool {
        self.with_state(|state| state.full)
    }

    /// Number of unread frames.
    pub fn len(&self) -> usize {
        self.with_state(|state| state.len())
    }

    /// Maximum number of buffered frames.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Frames refused since start-up because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.with_state(|state| state.dropped)
    }

    /// Latch a hardware receive error for the consumer (producer side).
    ///
    /// The first error wins until the consumer takes it.
    pub fn report_fault(&self, kind: embedded_can::ErrorKind) {
        self.with_state(|state| {
            if state.fault.is_none() {
                state.fault = Some(kind);
            }
        })
    }

    /// Take the latched hardware receive error, if any (consumer side).
    pub fn take_fault(&self) -> Option<embedded_can::ErrorKind> {
        self.with_state(|state| state.fault.take())
    }

    /// Hand out one role handle per execution context.
    ///
    /// Nothing stops a second call. Every access still goes through the lock,
    /// so extra handles stay memory-safe, but FIFO order between contexts
    /// only holds when the caller keeps a single producer and a single
    /// consumer alive.
    pub fn split(&self) -> (FrameProducer<'_, M, N>, FrameConsumer<'_, M, N>) {
        (FrameProducer { queue: self }, FrameConsumer { queue: self })
    }
}

//==================================================================================Role handles
/// Enqueue-only view of a [`FrameQueue`], owned by the interrupt context.
pub struct FrameProducer<'q, M: RawMutex, const N: usize> {
    queue: &'q FrameQueue<M, N>,
}

impl<'q, M: RawMutex, const N: usize> FrameProducer<'q, M, N> {
    /// See [`FrameQueue::enqueue`].
    #[inline]
    pub fn enqueue(&self, frame: CanFrame) -> bool {
        self.queue.enqueue(frame)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    /// See [`FrameQueue::report_fault`].
    #[inline]
    pub fn report_fault(&self, kind: embedded_can::ErrorKind) {
        self.queue.report_fault(kind)
    }
}

/// Dequeue-only view of a [`FrameQueue`], owned by the main loop.
pub struct FrameConsumer<'q, M: RawMutex, const N: usize> {
    queue: &'q FrameQueue<M, N>,
}

impl<'q, M: RawMutex, const N: usize> FrameConsumer<'q, M, N> {
    /// See [`FrameQueue::try_dequeue`].
    #[inline]
    pub fn try_dequeue(&self) -> Option<CanFrame> {
        self.queue.try_dequeue()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn dropped(&self) -> u32 {
        self.queue.dropped()
    }

    /// See [`FrameQueue::take_fault`].
    #[inline]
    pub fn take_fault(&self) -> Option<embedded_can::ErrorKind> {
        self.queue.take_fault()
    }
}
