//! # Taskbank
//!
//! A fixed worker-pool scheduler over a bank of spinlock-guarded, bounded
//! priority queues.
//!
//! This library provides low-overhead dispatch of short callables across a
//! pool of dedicated OS threads, with coarse-grained priority classes
//! ("urgent", "normal", "background"). Producers submit callables into a
//! fixed array of bounded ring queues, one per priority level; workers scan
//! the bank from the highest priority downward, execute what they find, and
//! sleep on a shared condition when every queue is empty.
//!
//! ## Key Properties
//!
//! - **Fixed shape**: thread count, priority-level count, and per-queue
//!   capacity are set at construction and never change
//! - **Strict priority arbitration**: a lower-index queue is always preferred;
//!   there is no aging or fairness correction
//! - **Short critical sections**: each queue is guarded by a test-and-test-
//!   and-set spinlock held only for index arithmetic, never for user code
//! - **No polling when idle**: idle workers sleep on a condition variable and
//!   are woken by submissions, with the check-then-wait race closed
//! - **Discard on teardown**: dropping the scheduler joins every worker;
//!   tasks still queued are discarded unexecuted by contract
//!
//! ## Example
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use taskbank::Scheduler;
//!
//! let scheduler = Scheduler::new(4, 3).unwrap();
//! let done = Arc::new(AtomicUsize::new(0));
//!
//! for priority in 0..3 {
//!     let done = Arc::clone(&done);
//!     scheduler.submit(priority, move || {
//!         done.fetch_add(1, Ordering::Relaxed);
//!     }).unwrap();
//! }
//!
//! while done.load(Ordering::Relaxed) < 3 {
//!     std::thread::yield_now();
//! }
//! ```
//!
//! Submission failures are distinguishable: out-of-range priority, queue
//! saturation, and shutdown each map to their own [`SchedulerError`]
//! variant, so callers can apply their own backpressure.
//!
//! For complete scenarios, see `tests/scheduler_test.rs`.

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling components: tasks, queues, the bank, and the scheduler.
pub mod core;
/// Configuration models for the scheduler.
pub mod config;
/// Test-and-test-and-set lock guarding each queue.
pub mod spinlock;
/// Shared utilities.
pub mod util;

pub use crate::config::SchedulerConfig;
pub use crate::core::{
    AppResult, BoundedQueue, QueueBank, RunningStats, Scheduler, SchedulerError, SchedulerStats,
    Task,
};
pub use crate::spinlock::{MappedSpinLockGuard, RawSpinLock, SpinLock, SpinLockGuard};
