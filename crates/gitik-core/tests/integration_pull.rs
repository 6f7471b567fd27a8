//! Integration test: discover repositories, pull them through the scheduler
//! using a stand-in `git` script, and check the summary buckets.
//!
//! Kept as a single test so the script is written once before any process is spawned.

#![cfg(unix)]

use gitik_core::config::GitikConfig;
use gitik_core::discover;
use gitik_core::pull::PullJob;
use gitik_core::scheduler;
use gitik_core::summary::Summary;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const FAKE_GIT: &str = r#"#!/bin/sh
name=$(basename "$PWD")
case "$1" in
  branch)
    case "$name" in
      detached*) exit 0 ;;
      *) echo main ;;
    esac
    ;;
  pull)
    shift
    case "$name" in
      current*|detached*) echo "Already up to date." ;;
      broken*) echo "fatal: couldn't find remote ref main" >&2; exit 1 ;;
      *) echo "Updating 1a2b..3c4d"; echo "Fast-forward $*"; echo "From example.org:$name" >&2 ;;
    esac
    ;;
  *) echo "unexpected: $*" >&2; exit 2 ;;
esac
"#;

fn write_fake_git(dir: &Path) -> PathBuf {
    let path = dir.join("fake-git");
    fs::write(&path, FAKE_GIT).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn make_repo(root: &Path, name: &str) -> PathBuf {
    let repo = root.join(name);
    fs::create_dir_all(repo.join(".git")).unwrap();
    repo
}

#[tokio::test]
async fn pull_batch_classifies_changed_unchanged_and_failed() {
    let tools = tempdir().unwrap();
    let git = write_fake_git(tools.path());

    let root = tempdir().unwrap();
    let changed = make_repo(root.path(), "changed-app");
    let current = make_repo(root.path(), "current-lib");
    let broken = make_repo(root.path(), "broken-svc");
    let detached = make_repo(root.path(), "detached-docs");
    fs::create_dir_all(root.path().join("not-a-repo")).unwrap();

    let repos = discover::discover_repositories(root.path()).unwrap();
    assert_eq!(repos.len(), 4);

    let cfg = GitikConfig {
        max_concurrent: 2,
        git_program: git.to_string_lossy().into_owned(),
        pull_args: vec!["--ff-only".to_string()],
        ..GitikConfig::default()
    };
    let job = PullJob::from_config(&cfg);
    let run = scheduler::run(
        repos,
        move |repo| {
            let job = job.clone();
            async move { job.run(repo).await }
        },
        cfg.max_concurrent,
    )
    .unwrap();
    let outcomes = run.collect().await;
    assert_eq!(outcomes.len(), 4);

    let detail_of = |p: &PathBuf| {
        outcomes
            .iter()
            .find(|o| &o.item == p)
            .map(|o| o.detail.clone())
            .unwrap()
    };
    let changed_detail = detail_of(&changed);
    assert!(
        changed_detail.starts_with(&format!("{}> git pull main\n", changed.display())),
        "{}",
        changed_detail
    );
    assert!(changed_detail.contains("Fast-forward --ff-only"));
    assert!(changed_detail.contains("From example.org:changed-app"));

    let detached_detail = detail_of(&detached);
    assert!(
        detached_detail.starts_with(&format!("{}> git pull\n", detached.display())),
        "{}",
        detached_detail
    );

    let broken_detail = detail_of(&broken);
    assert!(broken_detail.contains("couldn't find remote ref"), "{}", broken_detail);

    let summary = Summary::from_outcomes(outcomes, |d| cfg.is_no_change(d));
    assert_eq!(summary.changed, vec![changed]);
    assert_eq!(summary.failed, vec![broken]);
    let mut unchanged = summary.unchanged.clone();
    unchanged.sort();
    assert_eq!(unchanged, vec![current, detached]);
}
