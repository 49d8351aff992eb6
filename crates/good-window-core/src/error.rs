//! Error types for the Good Window core.

use thiserror::Error;

/// Errors raised by the dispatcher, timers and task queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The timer ID is invalid or the timer has already fired or been stopped.
    #[error("invalid or expired timer id")]
    InvalidTimerId,

    /// The task ID is invalid or the task has already run.
    #[error("invalid or already executed task id")]
    InvalidTaskId,

    /// The dispatcher was accessed from a thread other than its event-loop thread.
    #[error("dispatcher accessed from a thread other than its event-loop thread")]
    WrongThread,
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
