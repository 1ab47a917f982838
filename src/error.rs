use thiserror::Error;

/// Result type for list, queue and stream operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// A single task that panicked while a [`WorkQueue`](crate::WorkQueue) was running
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// Position of the task in registration order
    pub index: usize,
    /// Panic payload rendered as text
    pub message: String,
}

/// Errors produced by the collections and the worker queue.
///
/// Stream stages are total by contract and never produce one of these.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Index outside `0..len`
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Worker thread could not be spawned
    #[error("Thread error: {0}")]
    ThreadError(String),

    /// One or more queued tasks panicked
    #[error("{} of {total} tasks panicked", .failures.len())]
    TasksPanicked {
        total: usize,
        failures: Vec<TaskFailure>,
    },
}
