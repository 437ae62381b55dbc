//! Fixed array of per-priority task queues.

use crate::core::queue::BoundedQueue;
use crate::core::task::Task;

/// An ordered, fixed-length bank of bounded task queues, one per priority
/// level. Index 0 is the highest priority; the bank is never resized.
pub struct QueueBank {
    queues: Box<[BoundedQueue<Task>]>,
}

impl QueueBank {
    /// Build a bank of `levels` queues, each with room for `capacity` tasks.
    ///
    /// # Panics
    ///
    /// Panics if `levels` or `capacity` is zero.
    #[must_use]
    pub fn new(levels: usize, capacity: usize) -> Self {
        assert!(levels > 0, "bank needs at least one priority level");
        let queues = (0..levels)
            .map(|_| BoundedQueue::new(capacity))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { queues }
    }

    /// Number of priority levels.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.queues.len()
    }

    /// The queue at `priority`, or `None` if out of range.
    #[must_use]
    pub fn queue(&self, priority: usize) -> Option<&BoundedQueue<Task>> {
        self.queues.get(priority)
    }

    /// Pop the highest-priority task available right now.
    ///
    /// Scans strictly in index order; the first non-empty queue wins. This is
    /// strict priority arbitration with no fairness correction: a sustained
    /// stream of priority-0 submissions starves every other level.
    #[must_use]
    pub fn take_next(&self) -> Option<Task> {
        self.queues.iter().find_map(BoundedQueue::try_pop)
    }

    /// Total tasks resident across all levels. Advisory snapshot.
    #[must_use]
    pub fn queued_total(&self) -> usize {
        self.queues.iter().map(BoundedQueue::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_next_prefers_lower_index() {
        let bank = QueueBank::new(3, 8);
        assert!(bank.queue(2).unwrap().try_emplace(|| {}));
        assert!(bank.queue(0).unwrap().try_emplace(|| {}));

        // Level 0 wins even though level 2 was submitted first.
        assert!(bank.take_next().is_some());
        assert_eq!(bank.queue(0).unwrap().len(), 0);
        assert_eq!(bank.queue(2).unwrap().len(), 1);
    }

    #[test]
    fn test_queue_out_of_range() {
        let bank = QueueBank::new(2, 4);
        assert!(bank.queue(1).is_some());
        assert!(bank.queue(2).is_none());
    }

    #[test]
    fn test_queued_total() {
        let bank = QueueBank::new(2, 4);
        assert!(bank.queue(0).unwrap().try_emplace(|| {}));
        assert!(bank.queue(1).unwrap().try_emplace(|| {}));
        assert!(bank.queue(1).unwrap().try_emplace(|| {}));
        assert_eq!(bank.queued_total(), 3);
        let _ = bank.take_next();
        assert_eq!(bank.queued_total(), 2);
    }
}
