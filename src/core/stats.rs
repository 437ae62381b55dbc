//! Execution statistics: a running-average timer for callers and snapshot
//! counters for the scheduler.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Running count and arithmetic mean of recorded durations.
///
/// This is telemetry, not scheduling logic: the scheduler never consults it.
/// Callers that want per-task timing wrap their callable, measure around the
/// body, and feed the elapsed time here.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use taskbank::RunningStats;
///
/// let mut stats = RunningStats::default();
/// stats.record(Duration::from_micros(10));
/// stats.record(Duration::from_micros(30));
/// assert_eq!(stats.count(), 2);
/// assert_eq!(stats.mean(), Duration::from_micros(20));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningStats {
    count: u64,
    mean: Duration,
}

impl RunningStats {
    /// Fold one elapsed duration into the running mean.
    pub fn record(&mut self, elapsed: Duration) {
        let next = self.count + 1;
        let total = elapsed.as_nanos() + u128::from(self.count) * self.mean.as_nanos();
        let mean_nanos = total / u128::from(next);
        self.mean = Duration::from_nanos(u64::try_from(mean_nanos).unwrap_or(u64::MAX));
        self.count = next;
    }

    /// Number of durations recorded so far.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Mean of all recorded durations, zero before the first record.
    #[must_use]
    pub const fn mean(&self) -> Duration {
        self.mean
    }
}

/// Snapshot of scheduler activity.
#[derive(Debug, Clone, Default)]
pub struct SchedulerStats {
    /// Number of worker threads.
    pub worker_count: usize,
    /// Number of priority levels.
    pub priority_levels: usize,
    /// Per-level queue capacity.
    pub queue_capacity: usize,
    /// Tasks resident in the bank at snapshot time.
    pub queued: usize,
    /// Tasks accepted by `submit`.
    pub submitted: u64,
    /// Tasks executed to completion.
    pub completed: u64,
    /// Tasks whose callable panicked.
    pub failed: u64,
    /// Submissions rejected for saturation.
    pub rejected: u64,
}

/// Internal counters for scheduler statistics (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct SchedulerCounters {
    pub submitted: AtomicU64,
    pub completed: AtomicU64,
    pub failed: AtomicU64,
    pub rejected: AtomicU64,
}

impl SchedulerCounters {
    /// Get a snapshot of current statistics.
    pub fn snapshot(
        &self,
        worker_count: usize,
        priority_levels: usize,
        queue_capacity: usize,
        queued: usize,
    ) -> SchedulerStats {
        SchedulerStats {
            worker_count,
            priority_levels,
            queue_capacity,
            queued,
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_mean_matches_closed_form() {
        let mut stats = RunningStats::default();
        let samples = [5u64, 10, 15, 20, 50];
        for micros in samples {
            stats.record(Duration::from_micros(micros));
        }
        assert_eq!(stats.count(), 5);
        assert_eq!(stats.mean(), Duration::from_micros(20));
    }

    #[test]
    fn test_mean_zero_before_first_record() {
        let stats = RunningStats::default();
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.mean(), Duration::ZERO);
    }

    #[test]
    fn test_counters_snapshot() {
        let counters = SchedulerCounters::default();
        counters.submitted.fetch_add(10, Ordering::Relaxed);
        counters.completed.fetch_add(7, Ordering::Relaxed);
        counters.rejected.fetch_add(2, Ordering::Relaxed);

        let stats = counters.snapshot(4, 3, 128, 1);
        assert_eq!(stats.worker_count, 4);
        assert_eq!(stats.priority_levels, 3);
        assert_eq!(stats.queue_capacity, 128);
        assert_eq!(stats.queued, 1);
        assert_eq!(stats.submitted, 10);
        assert_eq!(stats.completed, 7);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.rejected, 2);
    }
}
