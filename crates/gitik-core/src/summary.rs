//! Final report: partition outcomes into changed, unchanged and failed.

use serde::Serialize;

use crate::job::JobOutcome;

/// Work items grouped by how their job ended, each in the order received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary<W> {
    pub changed: Vec<W>,
    pub unchanged: Vec<W>,
    pub failed: Vec<W>,
}

impl<W> Default for Summary<W> {
    fn default() -> Self {
        Self {
            changed: Vec::new(),
            unchanged: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<W> Summary<W> {
    /// Classifies every outcome using `is_no_change` on successful details.
    pub fn from_outcomes<I, P>(outcomes: I, is_no_change: P) -> Self
    where
        I: IntoIterator<Item = JobOutcome<W>>,
        P: Fn(&str) -> bool,
    {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome, &is_no_change);
        }
        summary
    }

    /// Adds one outcome to its bucket.
    pub fn record<P>(&mut self, outcome: JobOutcome<W>, is_no_change: P)
    where
        P: Fn(&str) -> bool,
    {
        if !outcome.success {
            self.failed.push(outcome.item);
        } else if is_no_change(&outcome.detail) {
            self.unchanged.push(outcome.item);
        } else {
            self.changed.push(outcome.item);
        }
    }

    /// Converts every item, keeping bucket membership and order.
    pub fn map<U, F>(self, mut f: F) -> Summary<U>
    where
        F: FnMut(W) -> U,
    {
        Summary {
            changed: self.changed.into_iter().map(&mut f).collect(),
            unchanged: self.unchanged.into_iter().map(&mut f).collect(),
            failed: self.failed.into_iter().map(&mut f).collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.changed.len() + self.unchanged.len() + self.failed.len()
    }
}
