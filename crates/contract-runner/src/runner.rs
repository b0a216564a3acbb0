//! Runs scenarios over one shared session
//!
//! The runner owns the session for the whole run. Dropping the runner
//! releases it, whatever the individual scenarios returned.

use std::time::Instant;

use futures::future::join_all;
use tracing::{info, warn};

use crate::error::ContractResult;
use crate::report::{Outcome, RunReport, ScenarioReport};
use crate::scenario::Scenario;
use crate::session::HttpSession;
use contract_common::RunnerConfig;

/// Contract runner bound to one backend
#[derive(Debug)]
pub struct ContractRunner {
    session: HttpSession,
}

impl ContractRunner {
    /// Open the session for a run
    pub fn new(config: RunnerConfig) -> ContractResult<Self> {
        let session = HttpSession::open(&config)?;
        Ok(Self { session })
    }

    /// Run one scenario; failures are folded into the outcome
    pub async fn run_scenario(&self, scenario: Scenario) -> ScenarioReport {
        let started = Instant::now();
        let outcome = Outcome::from(scenario.run(&self.session).await);
        let elapsed = started.elapsed();

        match &outcome {
            Outcome::Passed => info!(scenario = scenario.name(), ?elapsed, "passed"),
            Outcome::Skipped(reason) => info!(scenario = scenario.name(), %reason, "skipped"),
            Outcome::Failed(error) => warn!(
                scenario = scenario.name(),
                kind = %error.kind(),
                error = %error,
                "failed"
            ),
        }

        ScenarioReport {
            scenario,
            outcome,
            elapsed,
        }
    }

    /// Run the given scenarios one after another
    pub async fn run(&self, scenarios: &[Scenario]) -> RunReport {
        let mut reports = Vec::with_capacity(scenarios.len());
        for &scenario in scenarios {
            reports.push(self.run_scenario(scenario).await);
        }
        self.finish(reports)
    }

    /// Run the given scenarios concurrently over the shared session
    ///
    /// Reports keep the order of `scenarios`.
    pub async fn run_concurrently(&self, scenarios: &[Scenario]) -> RunReport {
        let reports = join_all(scenarios.iter().map(|&scenario| self.run_scenario(scenario))).await;
        self.finish(reports)
    }

    /// Run every known scenario
    pub async fn run_all(&self) -> RunReport {
        self.run(&Scenario::ALL).await
    }

    fn finish(&self, reports: Vec<ScenarioReport>) -> RunReport {
        let report = RunReport { reports };
        let summary = report.summary();
        info!(
            base_url = %self.session.config().base_url,
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            "contract run finished"
        );
        report
    }
}
