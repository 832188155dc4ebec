//! Configuration module

pub mod cli;
pub mod sweep_config;

pub use cli::{CliArgs, DEFAULT_TASKS};
pub use sweep_config::SweepConfig;
