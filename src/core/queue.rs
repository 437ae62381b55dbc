//! Bounded single-lock ring queue.
//!
//! One `BoundedQueue` backs each priority level of the scheduler. The whole
//! ring (slots, cursors, occupancy count) lives under one
//! [`SpinLock`](crate::SpinLock), and every operation holds that lock for its
//! full duration. Critical sections are index arithmetic only, never user
//! code.
//!
//! Empty and full both put `head == tail`, so the explicit `len` count is the
//! disambiguator; it is never derived from cursor comparison.
//!
//! The non-blocking `try_push`/`try_pop` are the only operations the
//! scheduler itself uses: a worker must never block inside a queue while it
//! also holds the scheduler-wide wait lock. The blocking `push`/`pop` exist
//! for producer/consumer code that explicitly wants backpressure.

use std::mem;
use std::time::Instant;

use parking_lot_core::SpinWait;

use crate::core::task::Task;
use crate::spinlock::SpinLock;

/// Ring storage and cursors. Mutable only under the queue's lock.
struct RingState<T> {
    slots: Box<[T]>,
    /// Next slot to consume.
    head: usize,
    /// Next slot to produce into.
    tail: usize,
    /// Occupied slot count, `0..=capacity`.
    len: usize,
    /// Time of the last successful push or pop.
    last_changed: Instant,
}

/// A fixed-capacity FIFO queue guarded by a spinlock.
///
/// Capacity is set at construction and never changes. Values are moved into
/// and out of slots; an empty slot holds `T::default()`.
pub struct BoundedQueue<T> {
    state: SpinLock<RingState<T>>,
    capacity: usize,
}

impl<T: Default> BoundedQueue<T> {
    /// Create a queue with room for `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be nonzero");
        let slots = (0..capacity)
            .map(|_| T::default())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            state: SpinLock::new(RingState {
                slots,
                head: 0,
                tail: 0,
                len: 0,
                last_changed: Instant::now(),
            }),
            capacity,
        }
    }

    /// Insert `value` at the tail, or hand it back if the queue is full.
    ///
    /// # Errors
    ///
    /// Returns `Err(value)` without mutating the ring when every slot is
    /// occupied. An occupied slot is never overwritten.
    pub fn try_push(&self, value: T) -> Result<(), T> {
        let mut ring = self.state.lock();
        if ring.len == self.capacity {
            return Err(value);
        }
        let tail = ring.tail;
        ring.slots[tail] = value;
        ring.tail = self.advance(tail);
        ring.len += 1;
        ring.last_changed = Instant::now();
        Ok(())
    }

    /// Insert `value` at the tail, spinning until a slot frees.
    ///
    /// Blocks (busy-waits with pause/yield hints) while the queue is full;
    /// a slot can only free through a concurrent pop.
    pub fn push(&self, value: T) {
        let mut pending = value;
        let mut spin = SpinWait::new();
        loop {
            match self.try_push(pending) {
                Ok(()) => return,
                Err(value) => pending = value,
            }
            if !spin.spin() {
                spin.reset();
            }
        }
    }

    /// Remove and return the value at the head, or `None` if empty.
    pub fn try_pop(&self) -> Option<T> {
        let mut ring = self.state.lock();
        if ring.len == 0 {
            return None;
        }
        let head = ring.head;
        let value = mem::take(&mut ring.slots[head]);
        ring.head = self.advance(head);
        ring.len -= 1;
        ring.last_changed = Instant::now();
        Some(value)
    }

    /// Remove and return the value at the head, spinning until one arrives.
    pub fn pop(&self) -> T {
        let mut spin = SpinWait::new();
        loop {
            if let Some(value) = self.try_pop() {
                return value;
            }
            if !spin.spin() {
                spin.reset();
            }
        }
    }

    /// Number of occupied slots.
    ///
    /// Snapshot under the lock; advisory the instant the lock is released.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().len
    }

    /// Whether no slot is occupied. Advisory, like [`len`](Self::len).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().len == 0
    }

    /// Whether every slot is occupied. Advisory, like [`len`](Self::len).
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.state.lock().len == self.capacity
    }

    /// Capacity fixed at construction.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Time of the last successful push or pop (construction time if none).
    #[must_use]
    pub fn last_changed(&self) -> Instant {
        self.state.lock().last_changed
    }

    const fn advance(&self, cursor: usize) -> usize {
        let next = cursor + 1;
        if next == self.capacity {
            0
        } else {
            next
        }
    }
}

impl BoundedQueue<Task> {
    /// Construct a task from `callable` and insert it, reporting `false`
    /// without mutation if the queue is full.
    pub fn try_emplace<F>(&self, callable: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.try_push(Task::new(callable)).is_ok()
    }

    /// Construct a task from `callable` and insert it, spinning until a slot
    /// frees.
    pub fn emplace<F>(&self, callable: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.push(Task::new(callable));
    }
}
