pub mod config;
pub mod logging;

pub mod discover;
pub mod git;
pub mod job;
pub mod pull;
pub mod scheduler;
pub mod summary;
