//! # contract-common
//!
//! Shared utilities for the contract runner: configuration and telemetry.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{ConfigError, RunnerConfig, DEFAULT_BASE_URL};
pub use telemetry::{
    try_init_tracing, try_init_tracing_with_config, LogFormat, TracingConfig, TracingError,
};
