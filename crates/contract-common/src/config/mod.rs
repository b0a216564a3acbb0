//! Configuration structs

mod runner_config;

pub use runner_config::{ConfigError, RunnerConfig, DEFAULT_BASE_URL};
