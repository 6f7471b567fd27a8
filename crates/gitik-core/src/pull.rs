//! The per-repository job: look up the current branch, then pull.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::GitikConfig;
use crate::git::GitCommand;
use crate::job::{self, JobOutcome};

/// Pulls one repository. Cheap to clone; each scheduled job gets its own copy.
#[derive(Debug, Clone)]
pub struct PullJob {
    program: String,
    pull_args: Vec<String>,
}

impl PullJob {
    pub fn new(program: impl Into<String>, pull_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            pull_args,
        }
    }

    pub fn from_config(cfg: &GitikConfig) -> Self {
        Self::new(cfg.git_program.clone(), cfg.pull_args.clone())
    }

    /// Runs the pull for `repo`; never fails, errors become a failed outcome.
    pub async fn run(&self, repo: PathBuf) -> JobOutcome<PathBuf> {
        let outcome = job::run_guarded(repo.clone(), self.pull(&repo)).await;
        if outcome.success {
            tracing::info!(repo = %repo.display(), "pull succeeded");
        } else {
            tracing::warn!(repo = %repo.display(), "pull failed: {}", outcome.detail);
        }
        outcome
    }

    /// Branch lookup and pull, in that order, against the same working directory.
    ///
    /// Returns `"<repo>> git pull <branch>\n<output>"`. A failed branch lookup
    /// only drops the branch name from the header; a failed pull is an error.
    pub async fn pull(&self, repo: &Path) -> Result<String> {
        let git = GitCommand::new(&self.program, repo);
        let mut header = format!("{}> git pull", repo.display());

        match git.run(&["branch", "--show-current"]).await {
            Ok(out) => {
                let branch = out.stdout.trim();
                if !branch.is_empty() {
                    header.push(' ');
                    header.push_str(branch);
                }
            }
            Err(e) => tracing::debug!(repo = %repo.display(), "branch lookup failed: {}", e),
        }

        let mut args = vec!["pull"];
        args.extend(self.pull_args.iter().map(String::as_str));
        let out = git.run(&args).await.with_context(|| header.clone())?;

        Ok(format!("{}\n{}", header, out.text()))
    }
}
