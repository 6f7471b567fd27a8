//! `gitik list` – show the repositories a pull would process.

use anyhow::Result;
use gitik_core::discover;
use std::path::Path;

pub fn run_list(root: &Path) -> Result<()> {
    let repos = discover::discover_repositories(root)?;
    if repos.is_empty() {
        println!("No repositories found in {}.", root.display());
    } else {
        for repo in repos {
            println!("{}", repo.display());
        }
    }
    Ok(())
}
