//! CLI for gitik.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gitik_core::config;
use std::path::PathBuf;

use commands::{run_list, run_pull};

/// Top-level CLI for gitik.
#[derive(Debug, Parser)]
#[command(name = "gitik")]
#[command(about = "gitik: pull many git repositories concurrently", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Execute git pull for every repository in a directory.
    Pull {
        /// Max pull processes running at once (defaults to max_concurrent from config).
        #[arg(short = 'm', long = "max", value_name = "N")]
        max: Option<usize>,
        /// Directory whose subdirectories are scanned (defaults to the current directory).
        #[arg(long, value_name = "PATH")]
        dir: Option<PathBuf>,
        /// Print the final summary as JSON instead of per-repository output.
        #[arg(long)]
        json: bool,
    },

    /// List the repositories that `pull` would process.
    List {
        /// Directory whose subdirectories are scanned (defaults to the current directory).
        #[arg(long, value_name = "PATH")]
        dir: Option<PathBuf>,
    },
}

fn root_or_cwd(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(d) => Ok(d),
        None => Ok(std::env::current_dir()?),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Pull { max, dir, json } => {
                let root = root_or_cwd(dir)?;
                run_pull(&cfg, &root, max, json).await?;
            }
            CliCommand::List { dir } => {
                let root = root_or_cwd(dir)?;
                run_list(&root)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
