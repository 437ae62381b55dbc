//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
///
/// Submission failures are distinguishable so callers can apply their own
/// backpressure: an out-of-range priority is a caller bug, a full queue is a
/// load condition, and a shutdown rejection is a lifecycle condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// Priority index outside the bank, checked at the call boundary and
    /// never clamped.
    #[error("invalid priority {priority}: scheduler has {levels} levels")]
    InvalidPriority {
        /// The rejected priority index.
        priority: usize,
        /// Number of levels the scheduler was built with.
        levels: usize,
    },
    /// The queue at the target priority is at capacity.
    #[error("queue full at priority {0}")]
    QueueFull(usize),
    /// The scheduler has begun (or finished) tearing down.
    #[error("scheduler has been shut down")]
    Shutdown,
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchedulerError::InvalidPriority {
            priority: 5,
            levels: 3,
        };
        assert_eq!(err.to_string(), "invalid priority 5: scheduler has 3 levels");

        let err = SchedulerError::QueueFull(1);
        assert_eq!(err.to_string(), "queue full at priority 1");

        let err = SchedulerError::Shutdown;
        assert_eq!(err.to_string(), "scheduler has been shut down");
    }
}
