//! CLI command handlers, one file per command.

mod list;
mod pull;

pub use list::run_list;
pub use pull::run_pull;
#[cfg(test)]
pub(crate) use pull::{render_summary, run_pull_to};
