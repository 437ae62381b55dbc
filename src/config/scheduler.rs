//! Scheduler configuration structure.

use serde::{Deserialize, Serialize};

/// Scheduler configuration.
///
/// All three knobs are fixed for the scheduler's lifetime: the worker pool
/// never grows, the bank is never resized, and every level shares the same
/// queue capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of worker threads to spawn.
    pub worker_count: usize,
    /// Number of priority levels (queue-bank size); 0 is the highest level.
    pub priority_levels: usize,
    /// Task capacity of each per-priority queue.
    pub queue_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
            priority_levels: 3,
            queue_capacity: 128,
        }
    }
}

impl SchedulerConfig {
    /// Configuration with one worker per available CPU, 3 priority levels,
    /// and 128 slots per queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker thread count.
    #[must_use]
    pub const fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set the number of priority levels.
    #[must_use]
    pub const fn with_priority_levels(mut self, priority_levels: usize) -> Self {
        self.priority_levels = priority_levels;
        self
    }

    /// Set the per-level queue capacity.
    #[must_use]
    pub const fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first zero-valued field.
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 {
            return Err("worker_count must be greater than 0".into());
        }
        if self.priority_levels == 0 {
            return Err("priority_levels must be greater than 0".into());
        }
        if self.queue_capacity == 0 {
            return Err("queue_capacity must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse a configuration from a JSON string and validate it.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation failure description.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
