//! Bounded-concurrency job scheduler.
//!
//! Runs one job per work item with at most `limit` jobs in flight. The first
//! `min(limit, N)` items are admitted up front; each time a job finishes its
//! outcome is yielded and the next backlog item takes the freed slot. Outcomes
//! come back in completion order, which is unspecified unless `limit == 1`.

mod window;

pub use window::{run, JobRun};

use thiserror::Error;

/// Errors raised before any job is started.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Concurrency limit must be at least 1.
    #[error("max concurrent jobs must be at least 1 (got {0})")]
    InvalidConcurrency(usize),
    /// Jobs are spawned as tokio tasks, so a runtime must be current.
    #[error("scheduler must be started from within a tokio runtime")]
    NoRuntime,
}
