//! Sliding admission window over a backlog of work items.

use std::collections::{HashMap, VecDeque};
use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::{Id, JoinError, JoinSet};

use crate::job::JobOutcome;

use super::SchedulerError;

/// A running batch: backlog not yet admitted plus the jobs currently in flight.
///
/// Pull outcomes with [`JobRun::next`] until it returns `None`. The run is
/// finite and cannot be restarted. Dropping it aborts jobs still in flight.
pub struct JobRun<W, F> {
    backlog: VecDeque<W>,
    execute: F,
    limit: usize,
    handle: Handle,
    in_flight: JoinSet<JobOutcome<W>>,
    // Item per task so a job that panics still yields an outcome for its item.
    admitted: HashMap<Id, W>,
    completed: usize,
}

/// Starts a run over `backlog` with at most `limit` jobs executing at once.
///
/// Returns a configuration error for `limit == 0`, before anything is spawned.
/// Must be called from within a tokio runtime; the first `min(limit, N)` jobs
/// are spawned immediately.
pub fn run<W, F, Fut>(
    backlog: impl IntoIterator<Item = W>,
    execute: F,
    limit: usize,
) -> Result<JobRun<W, F>, SchedulerError>
where
    W: Clone + Send + 'static,
    F: FnMut(W) -> Fut,
    Fut: Future<Output = JobOutcome<W>> + Send + 'static,
{
    if limit == 0 {
        return Err(SchedulerError::InvalidConcurrency(limit));
    }
    let handle = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;

    let mut run = JobRun {
        backlog: backlog.into_iter().collect(),
        execute,
        limit,
        handle,
        in_flight: JoinSet::new(),
        admitted: HashMap::new(),
        completed: 0,
    };
    tracing::debug!(backlog = run.backlog.len(), limit, "starting job run");
    while run.in_flight.len() < run.limit && run.admit_next() {}
    Ok(run)
}

impl<W, F, Fut> JobRun<W, F>
where
    W: Clone + Send + 'static,
    F: FnMut(W) -> Fut,
    Fut: Future<Output = JobOutcome<W>> + Send + 'static,
{
    /// Waits for whichever in-flight job finishes first and returns its outcome,
    /// admitting the next backlog item into the freed slot before returning.
    ///
    /// Returns `None` once the backlog and the in-flight set are both empty;
    /// that check happens before any await, so an empty run never suspends.
    pub async fn next(&mut self) -> Option<JobOutcome<W>> {
        if self.in_flight.is_empty() {
            debug_assert!(self.backlog.is_empty());
            debug_assert!(self.admitted.is_empty());
            return None;
        }

        let outcome = match self.in_flight.join_next_with_id().await? {
            Ok((id, outcome)) => {
                self.admitted.remove(&id);
                outcome
            }
            Err(err) => self.outcome_for_fault(err),
        };
        self.completed += 1;

        if self.admit_next() {
            tracing::trace!(in_flight = self.in_flight.len(), "admitted into freed slot");
        }
        Some(outcome)
    }

    /// Drains the run, returning every outcome in completion order.
    pub async fn collect(mut self) -> Vec<JobOutcome<W>> {
        let mut outcomes = Vec::with_capacity(self.len_remaining());
        while let Some(outcome) = self.next().await {
            outcomes.push(outcome);
        }
        outcomes
    }

    fn admit_next(&mut self) -> bool {
        let Some(item) = self.backlog.pop_front() else {
            return false;
        };
        let job = (self.execute)(item.clone());
        let abort = self.in_flight.spawn_on(job, &self.handle);
        self.admitted.insert(abort.id(), item);
        debug_assert!(
            self.in_flight.len() <= self.limit,
            "in-flight jobs exceeded limit"
        );
        true
    }

    fn outcome_for_fault(&mut self, err: JoinError) -> JobOutcome<W> {
        let item = self
            .admitted
            .remove(&err.id())
            .expect("every spawned job is recorded at admission");
        let cause = if err.is_panic() {
            let payload = err.into_panic();
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            format!("job panicked: {}", msg)
        } else {
            "job was cancelled".to_string()
        };
        tracing::warn!("{}", cause);
        JobOutcome::failed(item, cause)
    }
}

impl<W, F> JobRun<W, F> {
    /// Number of jobs currently executing.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Number of work items not yet admitted.
    pub fn pending(&self) -> usize {
        self.backlog.len()
    }

    /// Number of outcomes already yielded.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Outcomes still to be yielded (in flight plus backlog).
    pub fn len_remaining(&self) -> usize {
        self.in_flight.len() + self.backlog.len()
    }

    /// True once every outcome has been yielded.
    pub fn is_finished(&self) -> bool {
        self.len_remaining() == 0
    }
}
