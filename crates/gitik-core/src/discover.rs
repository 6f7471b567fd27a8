//! Repository discovery: immediate subdirectories that hold a git checkout.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// True if `dir` contains a `.git` entry. A `.git` file (worktree or
/// submodule pointer) counts as well as a `.git` directory.
pub fn is_repository(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Lists the top-level subdirectories of `root` that are repositories,
/// sorted by path so the backlog order is stable between runs.
pub fn discover_repositories(root: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(root).with_context(|| format!("read directory: {}", root.display()))?;

    let mut repos = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("skipping unreadable entry in {}: {}", root.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() && is_repository(&path) {
            repos.push(path);
        }
    }
    repos.sort();
    tracing::debug!(root = %root.display(), count = repos.len(), "discovered repositories");
    Ok(repos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn finds_only_direct_children_with_git() {
        let root = tempdir().unwrap();
        let r = root.path();
        fs::create_dir_all(r.join("beta/.git")).unwrap();
        fs::create_dir_all(r.join("alpha/.git")).unwrap();
        fs::create_dir_all(r.join("plain/src")).unwrap();
        fs::create_dir_all(r.join("outer/nested/.git")).unwrap();
        fs::write(r.join("notes.txt"), "x").unwrap();

        let repos = discover_repositories(r).unwrap();
        assert_eq!(repos, vec![r.join("alpha"), r.join("beta")]);
    }

    #[test]
    fn git_file_counts_as_repository() {
        let root = tempdir().unwrap();
        let wt = root.path().join("worktree");
        fs::create_dir_all(&wt).unwrap();
        fs::write(wt.join(".git"), "gitdir: /elsewhere/.git/worktrees/wt\n").unwrap();

        assert!(is_repository(&wt));
        assert_eq!(discover_repositories(root.path()).unwrap(), vec![wt]);
    }

    #[test]
    fn empty_root_yields_empty_backlog() {
        let root = tempdir().unwrap();
        assert!(discover_repositories(root.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = tempdir().unwrap();
        let err = discover_repositories(&root.path().join("nope")).unwrap_err();
        assert!(format!("{:#}", err).contains("read directory"));
    }
}
