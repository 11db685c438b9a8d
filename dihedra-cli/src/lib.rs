//! The `dihedra` pipeline: configuration and the file-level steps behind
//! each subcommand of the binary.

pub mod config;
pub mod steps;

pub use config::Config;
pub use steps::pipeline::{run, RunSummary};
pub use steps::StepSummary;
