//! Job outcome record and the wrapper that turns job errors into outcomes.

use serde::Serialize;
use std::future::Future;

/// Result of one job, produced exactly once per admitted work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobOutcome<W> {
    /// The work item this job ran for.
    pub item: W,
    /// Whether the job's operation succeeded.
    pub success: bool,
    /// Captured output on success, or a description of the failure.
    pub detail: String,
}

impl<W> JobOutcome<W> {
    pub fn succeeded(item: W, detail: impl Into<String>) -> Self {
        Self {
            item,
            success: true,
            detail: detail.into(),
        }
    }

    /// Failure outcome. An empty description is replaced so failures always carry a diagnostic.
    pub fn failed(item: W, detail: impl Into<String>) -> Self {
        let mut detail = detail.into();
        if detail.trim().is_empty() {
            detail = "job failed without diagnostic output".to_string();
        }
        Self {
            item,
            success: false,
            detail,
        }
    }
}

/// Awaits `op` for `item` and converts its error, if any, into a failure outcome.
///
/// Errors are rendered with their full context chain (`{:#}`), so a failure
/// reads like `./repo> git pull main: `git pull` failed with exit status: 1: ...`.
pub async fn run_guarded<W, Fut>(item: W, op: Fut) -> JobOutcome<W>
where
    Fut: Future<Output = anyhow::Result<String>>,
{
    match op.await {
        Ok(detail) => JobOutcome::succeeded(item, detail),
        Err(e) => JobOutcome::failed(item, format!("{:#}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[tokio::test]
    async fn ok_becomes_success() {
        let outcome = run_guarded("a", async { Ok("pulled".to_string()) }).await;
        assert_eq!(outcome, JobOutcome::succeeded("a", "pulled"));
    }

    #[tokio::test]
    async fn error_becomes_failure_with_context_chain() {
        let outcome = run_guarded("b", async {
            Err::<String, _>(anyhow::anyhow!("exit status: 1")).context("b> git pull")
        })
        .await;
        assert!(!outcome.success);
        assert_eq!(outcome.item, "b");
        assert_eq!(outcome.detail, "b> git pull: exit status: 1");
    }

    #[test]
    fn empty_failure_detail_is_replaced() {
        let outcome = JobOutcome::failed(1u32, "  ");
        assert!(!outcome.success);
        assert!(!outcome.detail.trim().is_empty());
    }
}
