//! # contract-runner
//!
//! Issues HTTP requests against a running chat backend and checks the
//! status codes and JSON payload shapes it answers with. Each check is a
//! [`Scenario`]; running one yields an [`Outcome`] of pass, fail or skip.

pub mod error;
pub mod payload;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod session;

pub use error::{ContractError, ContractResult, FailureKind};
pub use payload::{Payload, REPLY_KEYS};
pub use report::{Outcome, RunReport, RunSummary, ScenarioReport};
pub use runner::ContractRunner;
pub use scenario::{Method, Scenario, ScenarioRequest};
pub use session::HttpSession;
