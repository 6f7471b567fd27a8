use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::scheduler::SchedulerError;

/// Output phrases git prints when a pull had nothing to fetch or merge.
pub const DEFAULT_NO_CHANGE_MARKERS: &[&str] = &["Already up to date.", "Already up-to-date."];

/// Global configuration loaded from `~/.config/gitik/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitikConfig {
    /// Maximum number of `git pull` processes running at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Git executable to invoke (name on PATH or absolute path).
    #[serde(default = "default_git_program")]
    pub git_program: String,
    /// Extra arguments appended to `git pull` (e.g. `["--ff-only"]`).
    #[serde(default)]
    pub pull_args: Vec<String>,
    /// Phrases in pull output that mean the repository was already current.
    #[serde(default = "default_no_change_markers")]
    pub no_change_markers: Vec<String>,
}

fn default_max_concurrent() -> usize {
    10
}

fn default_git_program() -> String {
    "git".to_string()
}

fn default_no_change_markers() -> Vec<String> {
    DEFAULT_NO_CHANGE_MARKERS.iter().map(|s| s.to_string()).collect()
}

impl Default for GitikConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            git_program: default_git_program(),
            pull_args: Vec::new(),
            no_change_markers: default_no_change_markers(),
        }
    }
}

impl GitikConfig {
    /// Rejects settings the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.max_concurrent == 0 {
            return Err(SchedulerError::InvalidConcurrency(self.max_concurrent));
        }
        Ok(())
    }

    /// True if `detail` contains any configured no-change marker.
    pub fn is_no_change(&self, detail: &str) -> bool {
        self.no_change_markers
            .iter()
            .any(|marker| !marker.is_empty() && detail.contains(marker.as_str()))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gitik")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GitikConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = GitikConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: GitikConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
