//! Scenario outcomes and the run report

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::ContractError;
use crate::scenario::Scenario;

/// Result of one scenario
#[derive(Debug)]
pub enum Outcome {
    Passed,
    Failed(ContractError),
    /// The scenario could not be evaluated in this environment
    Skipped(String),
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Short status word for the report
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed(_) => "FAIL",
            Self::Skipped(_) => "SKIP",
        }
    }
}

impl From<Result<Outcome, ContractError>> for Outcome {
    fn from(result: Result<Outcome, ContractError>) -> Self {
        result.unwrap_or_else(Outcome::Failed)
    }
}

/// Outcome of one scenario with its timing
#[derive(Debug)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} ms)",
            self.outcome.label(),
            self.scenario,
            self.elapsed.as_millis()
        )?;
        match &self.outcome {
            Outcome::Passed => Ok(()),
            Outcome::Failed(error) => write!(f, ": {}: {error}", error.kind()),
            Outcome::Skipped(reason) => write!(f, ": {reason}"),
        }
    }
}

/// Pass/fail/skip counts of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scenarios: {} passed, {} failed, {} skipped",
            self.total, self.passed, self.failed, self.skipped
        )
    }
}

/// All scenario reports of one run, in execution order
#[derive(Debug, Default)]
pub struct RunReport {
    pub reports: Vec<ScenarioReport>,
}

impl RunReport {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total: self.reports.len(),
            passed: self.count(Outcome::is_passed),
            failed: self.count(Outcome::is_failed),
            skipped: self.count(Outcome::is_skipped),
        }
    }

    /// True when no scenario failed; skips do not count against the run
    pub fn is_success(&self) -> bool {
        !self.reports.iter().any(|report| report.outcome.is_failed())
    }

    /// Report for one scenario, if it ran
    pub fn get(&self, scenario: Scenario) -> Option<&ScenarioReport> {
        self.reports.iter().find(|report| report.scenario == scenario)
    }

    fn count(&self, predicate: fn(&Outcome) -> bool) -> usize {
        self.reports
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            writeln!(f, "{report}")?;
        }
        write!(f, "{}", self.summary())
    }
}
