//! Contract runner entry point
//!
//! Run with:
//! ```bash
//! BASE_URL=http://localhost:3000 cargo run -p contract-runner
//! ```
//!
//! Prints one line per scenario and a summary. Exits with status 1 when a
//! scenario failed or the run could not start. Skips do not fail the run.

use contract_common::{try_init_tracing_with_config, LogFormat, RunnerConfig, TracingConfig};
use contract_runner::ContractRunner;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    let tracing_config = TracingConfig::from_env();
    let format = tracing_config.format;
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    match run(format).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!(error = %e, "Contract run failed to start");
            std::process::exit(1);
        }
    }
}

async fn run(format: LogFormat) -> Result<bool, Box<dyn std::error::Error>> {
    // Load configuration
    let config = RunnerConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(base_url = %config.base_url, "Starting contract run");

    let runner = ContractRunner::new(config)?;
    let report = runner.run_all().await;

    match format {
        LogFormat::Json => println!("{}", serde_json::to_string(&report.summary())?),
        LogFormat::Pretty => println!("{report}"),
    }

    Ok(report.is_success())
}
