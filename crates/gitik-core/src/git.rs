//! Single git invocation in a repository working directory.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::Command;

/// Error from one git invocation.
#[derive(Debug, Error)]
pub enum GitError {
    /// The process could not be started (binary missing, bad working dir, ...).
    #[error("failed to start `{program} {args}` in {}", .dir.display())]
    Spawn {
        program: String,
        args: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The process ran and exited unsuccessfully.
    #[error("`{program} {args}` failed with {status}: {detail}")]
    Failed {
        program: String,
        args: String,
        status: ExitStatus,
        detail: String,
    },
}

/// Captured text of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// Stdout followed by stderr, each trimmed, skipping whichever is empty.
    pub fn text(&self) -> String {
        let out = self.stdout.trim_end();
        let err = self.stderr.trim_end();
        match (out.is_empty(), err.is_empty()) {
            (false, false) => format!("{}\n{}", out, err),
            (false, true) => out.to_string(),
            (true, false) => err.to_string(),
            (true, true) => String::new(),
        }
    }
}

/// Runs git commands with a fixed program and working directory.
#[derive(Debug, Clone)]
pub struct GitCommand {
    program: String,
    working_dir: PathBuf,
}

impl GitCommand {
    pub fn new(program: impl Into<String>, working_dir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    /// Runs `git <args>` to completion and captures its output.
    ///
    /// Stdin is closed and terminal prompts are disabled so a repository that
    /// needs credentials fails instead of blocking the batch. The child is
    /// killed if this future is dropped.
    pub async fn run(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        let joined = args.join(" ");
        tracing::debug!(dir = %self.working_dir.display(), "{} {}", self.program, joined);

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.working_dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| GitError::Spawn {
                program: self.program.clone(),
                args: joined.clone(),
                dir: self.working_dir.clone(),
                source,
            })?;

        let captured = GitOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            let detail = match captured.text() {
                t if t.is_empty() => "no output".to_string(),
                t => t,
            };
            return Err(GitError::Failed {
                program: self.program.clone(),
                args: joined,
                status: output.status,
                detail,
            });
        }
        Ok(captured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_joins_stdout_and_stderr() {
        let out = GitOutput {
            stdout: "Updating 1a2b..3c4d\nFast-forward\n".into(),
            stderr: "From example.org:repo\n".into(),
        };
        assert_eq!(
            out.text(),
            "Updating 1a2b..3c4d\nFast-forward\nFrom example.org:repo"
        );
    }

    #[test]
    fn text_skips_empty_streams() {
        let only_err = GitOutput {
            stdout: String::new(),
            stderr: "warning\n".into(),
        };
        assert_eq!(only_err.text(), "warning");
        assert_eq!(GitOutput::default().text(), "");
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitCommand::new("gitik-test-no-such-binary", dir.path());
        let err = git.run(&["status"]).await.unwrap_err();
        assert!(matches!(err, GitError::Spawn { .. }), "{:?}", err);
        let msg = format!("{:#}", anyhow::Error::from(err));
        assert!(msg.contains("gitik-test-no-such-binary status"), "{}", msg);
    }
}
