//! Domain model types

pub mod run_config;
pub mod summary;

pub use run_config::RunConfig;
pub use summary::{CommitSummary, RunSummary};
