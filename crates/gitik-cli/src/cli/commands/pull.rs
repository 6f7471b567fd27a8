//! `gitik pull` – pull every discovered repository with bounded concurrency.

use anyhow::Result;
use gitik_core::config::GitikConfig;
use gitik_core::discover;
use gitik_core::pull::PullJob;
use gitik_core::scheduler;
use gitik_core::summary::Summary;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub async fn run_pull(cfg: &GitikConfig, root: &Path, max: Option<usize>, json: bool) -> Result<()> {
    run_pull_to(&mut io::stdout(), cfg, root, max, json).await
}

/// Runs the pull batch, writing streamed output and the final summary to `out`.
///
/// `max` overrides `max_concurrent` from config and is validated before the
/// directory is scanned. Failed repositories only show up in the summary.
pub(crate) async fn run_pull_to<W: Write>(
    out: &mut W,
    cfg: &GitikConfig,
    root: &Path,
    max: Option<usize>,
    json: bool,
) -> Result<()> {
    let cfg = GitikConfig {
        max_concurrent: max.unwrap_or(cfg.max_concurrent),
        ..cfg.clone()
    };
    cfg.validate()?;

    let repos = discover::discover_repositories(root)?;
    if !json {
        writeln!(out, "Searching repos in {}", root.display())?;
        writeln!(out, "Detected repos:")?;
        for repo in &repos {
            writeln!(out, "{}", repo.display())?;
        }
    }
    tracing::info!(
        root = %root.display(),
        repos = repos.len(),
        max_concurrent = cfg.max_concurrent,
        "starting pull"
    );

    let job = PullJob::from_config(&cfg);
    let mut run = scheduler::run(
        repos,
        move |repo| {
            let job = job.clone();
            async move { job.run(repo).await }
        },
        cfg.max_concurrent,
    )?;

    let mut summary = Summary::default();
    while let Some(outcome) = run.next().await {
        if !json {
            writeln!(out, "---")?;
            writeln!(out, "{}", outcome.detail)?;
        }
        summary.record(outcome, |d| cfg.is_no_change(d));
    }

    tracing::info!(
        changed = summary.changed.len(),
        unchanged = summary.unchanged.len(),
        failed = summary.failed.len(),
        "pull finished"
    );

    render_summary(out, summary, json)
}

/// Writes the Updated / Up to date / Responded error sections, or the same
/// buckets as JSON. Paths that are not UTF-8 are rendered lossily.
pub(crate) fn render_summary<W: Write>(out: &mut W, summary: Summary<PathBuf>, json: bool) -> Result<()> {
    let printable = summary.map(|p| p.to_string_lossy().into_owned());
    if json {
        serde_json::to_writer_pretty(&mut *out, &printable)?;
        writeln!(out)?;
    } else {
        write_section(out, "---Updated---", &printable.changed)?;
        write_section(out, "---Up to date---", &printable.unchanged)?;
        write_section(out, "---Responded error---", &printable.failed)?;
    }
    Ok(())
}

fn write_section<W: Write>(out: &mut W, title: &str, repos: &[String]) -> io::Result<()> {
    writeln!(out, "{}", title)?;
    for repo in repos {
        writeln!(out, "{}", repo)?;
    }
    Ok(())
}
