//! Worker pool scheduling over the priority queue bank.
//!
//! The scheduler spawns a fixed set of dedicated OS threads at construction.
//! Each worker repeatedly scans the bank from priority 0 downward, executes
//! the first task found, and otherwise sleeps on a shared condition until a
//! submission or shutdown wakes it.
//!
//! # Design
//!
//! - **No polling when idle**: an idle worker waits on a `Condvar`; `submit`
//!   signals it after enqueueing.
//! - **Lost wakeups closed**: a worker that found every queue empty re-scans
//!   while holding the wait lock before waiting, and `submit` passes through
//!   the same lock before notifying. A submission can therefore never fall
//!   between a worker's last scan and its wait.
//! - **Strict priority**: the scan order gives lower indices absolute
//!   precedence; there is no aging or fairness correction, and a sustained
//!   priority-0 stream starves the other levels.
//! - **Discard on teardown**: shutdown stops the workers and joins them;
//!   tasks still resident in the bank are dropped unexecuted. That is the
//!   shutdown contract, not a defect.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info, warn};

use crate::config::SchedulerConfig;
use crate::core::bank::QueueBank;
use crate::core::error::SchedulerError;
use crate::core::stats::{SchedulerCounters, SchedulerStats};
use crate::core::task::Task;

/// State guarded by the scheduler-wide wait lock.
///
/// Shutdown is mirrored here so a worker's "check, then wait" runs entirely
/// under the lock that the destructor's "set, then notify" also takes.
struct WakeState {
    shutdown: bool,
}

/// State shared between the scheduler handle and its worker threads.
struct Shared {
    bank: QueueBank,
    /// Fast-path lifecycle flag; also recorded in `wake_state` under the lock.
    running: AtomicBool,
    wake_state: Mutex<WakeState>,
    wake_cvar: Condvar,
    counters: SchedulerCounters,
}

/// A fixed pool of worker threads draining a bank of priority queues.
///
/// Priority 0 is the highest. Construction spawns every worker; dropping the
/// scheduler (or calling [`shutdown`](Self::shutdown)) stops and joins them
/// all, discarding any tasks still queued.
///
/// The scheduler is a singular owner of its threads and queues: it is `Send`
/// and `Sync` but deliberately not `Clone`.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use taskbank::Scheduler;
///
/// let scheduler = Scheduler::new(2, 3).unwrap();
/// let hits = Arc::new(AtomicUsize::new(0));
///
/// let counter = Arc::clone(&hits);
/// scheduler.submit(0, move || {
///     counter.fetch_add(1, Ordering::Relaxed);
/// }).unwrap();
///
/// while hits.load(Ordering::Relaxed) == 0 {
///     std::thread::yield_now();
/// }
/// scheduler.shutdown();
/// ```
pub struct Scheduler {
    config: SchedulerConfig,
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl Scheduler {
    /// Start a scheduler with `worker_count` threads and `priority_levels`
    /// queues of default capacity.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if either count is zero.
    pub fn new(worker_count: usize, priority_levels: usize) -> Result<Self, SchedulerError> {
        Self::with_config(
            SchedulerConfig::new()
                .with_worker_count(worker_count)
                .with_priority_levels(priority_levels),
        )
    }

    /// Start a scheduler from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if validation fails.
    pub fn with_config(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;

        let shared = Arc::new(Shared {
            bank: QueueBank::new(config.priority_levels, config.queue_capacity),
            running: AtomicBool::new(true),
            wake_state: Mutex::new(WakeState { shutdown: false }),
            wake_cvar: Condvar::new(),
            counters: SchedulerCounters::default(),
        });

        let mut workers = Vec::with_capacity(config.worker_count);
        for worker_id in 0..config.worker_count {
            workers.push(spawn_worker(worker_id, Arc::clone(&shared)));
        }

        info!(
            worker_count = config.worker_count,
            priority_levels = config.priority_levels,
            queue_capacity = config.queue_capacity,
            "scheduler started"
        );

        Ok(Self {
            config,
            shared,
            workers: Mutex::new(workers),
        })
    }

    /// Enqueue `callable` at `priority` (0 = highest) and signal a worker.
    ///
    /// The priority is validated at this boundary, never clamped. Saturation
    /// policy is reject: a full target queue returns
    /// [`SchedulerError::QueueFull`] and the callable is dropped; callers
    /// that want blocking backpressure can retry or use
    /// [`BoundedQueue::push`](crate::BoundedQueue::push) on their own queues.
    ///
    /// Submissions racing with teardown are rejected once the running flag
    /// clears; one that slips into the teardown window is discarded
    /// unexecuted, like any other task resident at shutdown.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::Shutdown`] after teardown has begun
    /// - [`SchedulerError::InvalidPriority`] when `priority` is out of range
    /// - [`SchedulerError::QueueFull`] when the target queue is saturated
    pub fn submit<F>(&self, priority: usize, callable: F) -> Result<(), SchedulerError>
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.shared.running.load(Ordering::Acquire) {
            return Err(SchedulerError::Shutdown);
        }

        let levels = self.shared.bank.level_count();
        let Some(queue) = self.shared.bank.queue(priority) else {
            return Err(SchedulerError::InvalidPriority { priority, levels });
        };

        if !queue.try_emplace(callable) {
            self.shared.counters.rejected.fetch_add(1, Ordering::Relaxed);
            warn!(priority, "submission rejected: queue full");
            return Err(SchedulerError::QueueFull(priority));
        }

        self.shared.counters.submitted.fetch_add(1, Ordering::Relaxed);
        debug!(priority, "task submitted");

        // Pass through the wait lock before notifying: a worker between its
        // empty re-scan and its wait holds this lock, so the notify below
        // cannot land inside that window and be lost.
        drop(self.shared.wake_state.lock());
        self.shared.wake_cvar.notify_one();
        Ok(())
    }

    /// Number of priority levels this scheduler was built with.
    #[must_use]
    pub fn priority_levels(&self) -> usize {
        self.shared.bank.level_count()
    }

    /// Get current scheduler statistics.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.shared.counters.snapshot(
            self.config.worker_count,
            self.shared.bank.level_count(),
            self.config.queue_capacity,
            self.shared.bank.queued_total(),
        )
    }

    /// Stop the workers and join them all.
    ///
    /// Idempotent. Tasks still queued are discarded unexecuted. Blocks until
    /// every worker thread has exited, so a task that never returns blocks
    /// teardown; must not be called from inside a task.
    pub fn shutdown(&self) {
        if !self.shared.running.swap(false, Ordering::AcqRel) {
            return; // already shut down
        }

        info!("shutting down scheduler");

        {
            let mut wake = self.shared.wake_state.lock();
            wake.shutdown = true;
        }
        self.shared.wake_cvar.notify_all();

        let mut workers = self.workers.lock();
        for (worker_id, handle) in workers.drain(..).enumerate() {
            if handle.join().is_err() {
                warn!(worker_id, "worker thread panicked");
            }
        }

        let discarded = self.shared.bank.queued_total();
        info!(discarded, "scheduler shut down");
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawn one worker thread running the scan/execute/wait loop.
fn spawn_worker(worker_id: usize, shared: Arc<Shared>) -> JoinHandle<()> {
    thread::Builder::new()
        .name(format!("taskbank-worker-{worker_id}"))
        .spawn(move || {
            debug!(worker_id, "worker thread started");

            loop {
                if !shared.running.load(Ordering::Acquire) {
                    break;
                }

                if let Some(task) = shared.bank.take_next() {
                    execute(worker_id, &shared, task);
                    continue;
                }

                let mut wake = shared.wake_state.lock();
                if wake.shutdown {
                    break;
                }
                // Re-scan under the wait lock: a submission that landed
                // between the scan above and this acquisition must be taken
                // here instead of waiting past its notify.
                if let Some(task) = shared.bank.take_next() {
                    drop(wake);
                    execute(worker_id, &shared, task);
                    continue;
                }
                shared.wake_cvar.wait(&mut wake);
                // Spurious or signaled either way: loop and re-scan.
            }

            debug!(worker_id, "worker thread exiting");
        })
        .expect("failed to spawn worker thread")
}

/// Invoke one task exactly once, keeping the worker alive across panics.
fn execute(worker_id: usize, shared: &Shared, task: Task) {
    match panic::catch_unwind(AssertUnwindSafe(|| task.run())) {
        Ok(()) => {
            shared.counters.completed.fetch_add(1, Ordering::Relaxed);
        }
        Err(_) => {
            shared.counters.failed.fetch_add(1, Ordering::Relaxed);
            error!(worker_id, "task panicked; worker continues");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, Instant};

    fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if done() {
                return true;
            }
            thread::yield_now();
        }
        done()
    }

    #[test]
    fn test_executes_submitted_task() {
        let scheduler = Scheduler::new(2, 3).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        scheduler
            .submit(1, move || {
                counter.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();

        assert!(wait_until(Duration::from_secs(5), || {
            scheduler.stats().completed == 1
        }));
        assert_eq!(hits.load(Ordering::Relaxed), 1);
        assert_eq!(scheduler.stats().submitted, 1);
    }

    #[test]
    fn test_invalid_priority_rejected_at_boundary() {
        let scheduler = Scheduler::new(1, 2).unwrap();
        let err = scheduler.submit(2, || {}).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::InvalidPriority {
                priority: 2,
                levels: 2
            }
        );
        assert_eq!(scheduler.stats().submitted, 0);
    }

    #[test]
    fn test_submit_after_shutdown_rejected() {
        let scheduler = Scheduler::new(1, 1).unwrap();
        scheduler.shutdown();
        assert_eq!(scheduler.submit(0, || {}), Err(SchedulerError::Shutdown));
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let scheduler = Scheduler::new(2, 2).unwrap();
        scheduler.shutdown();
        scheduler.shutdown();
    }

    #[test]
    fn test_panicking_task_keeps_worker_alive() {
        let scheduler = Scheduler::new(1, 1).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        scheduler.submit(0, || panic!("task failure")).unwrap();
        let counter = Arc::clone(&hits);
        scheduler
            .submit(0, move || {
                counter.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();

        assert!(wait_until(Duration::from_secs(5), || {
            let stats = scheduler.stats();
            stats.completed == 1 && stats.failed == 1
        }));
        assert_eq!(hits.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_zero_workers_invalid() {
        assert!(matches!(
            Scheduler::new(0, 1),
            Err(SchedulerError::InvalidConfig(_))
        ));
    }
}
