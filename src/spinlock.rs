//! Spinlock implementation
//!
//! This module provides the test-and-test-and-set lock that guards each task
//! queue's internal state. Critical sections in this crate are a few index
//! operations long, which is the regime where a spinlock beats a blocking
//! mutex: the expected wait is shorter than a context switch.
//!
//! The raw lock implements [`lock_api::RawMutex`], so guard types, poisoning
//! freedom, and mapped guards all come from `lock_api` rather than being
//! hand-rolled here.
//!
//! # Characteristics
//!
//! - One `AtomicBool` of state, no ownership tracking
//! - No fairness: a thread can spin indefinitely under sustained contention
//! - No reentrancy: relocking on the same thread deadlocks
//!
//! # Examples
//!
//! Basic usage:
//!
//! ```
//! use taskbank::SpinLock;
//!
//! let lock = SpinLock::new(0);
//! *lock.lock() = 10;
//! assert_eq!(*lock.lock(), 10);
//! ```
//!
//! Concurrent access:
//!
//! ```
//! use taskbank::SpinLock;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let lock = Arc::new(SpinLock::new(0));
//! let mut handles = vec![];
//!
//! for _ in 0..10 {
//!     let lock = Arc::clone(&lock);
//!     handles.push(thread::spawn(move || {
//!         let mut num = lock.lock();
//!         *num += 1;
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(*lock.lock(), 10);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use lock_api::{GuardSend, RawMutex};
use parking_lot_core::SpinWait;

/// Raw test-and-test-and-set lock over a single atomic flag.
///
/// `lock` issues one atomic swap; when contended it spins on plain relaxed
/// loads (so the cache line stays shared between waiters) with pause/yield
/// hints, and only retries the swap once the flag has been observed clear.
pub struct RawSpinLock {
    held: AtomicBool,
}

unsafe impl RawMutex for RawSpinLock {
    const INIT: Self = Self {
        held: AtomicBool::new(false),
    };

    type GuardMarker = GuardSend;

    fn lock(&self) {
        while self.held.swap(true, Ordering::Acquire) {
            // Contended: re-read without exclusive ownership of the line
            // until the holder releases, then retry the swap.
            let mut spin = SpinWait::new();
            while self.held.load(Ordering::Relaxed) {
                if !spin.spin() {
                    spin.reset();
                }
            }
        }
    }

    fn try_lock(&self) -> bool {
        // Peek first so a held lock costs one shared read, not a swap.
        !self.held.load(Ordering::Relaxed) && !self.held.swap(true, Ordering::Acquire)
    }

    unsafe fn unlock(&self) {
        self.held.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.held.load(Ordering::Relaxed)
    }
}

/// A mutual exclusion primitive backed by [`RawSpinLock`].
pub type SpinLock<T> = lock_api::Mutex<RawSpinLock, T>;

/// RAII guard returned by [`SpinLock::lock`] and [`SpinLock::try_lock`].
pub type SpinLockGuard<'a, T> = lock_api::MutexGuard<'a, RawSpinLock, T>;

/// Guard mapped to a component of the locked data.
pub type MappedSpinLockGuard<'a, T> = lock_api::MappedMutexGuard<'a, RawSpinLock, T>;
