//! Contract failure types
//!
//! Every failure a scenario can hit is either a transport problem or a
//! violation of the backend's contract. Neither is retried.

use reqwest::StatusCode;
use serde_json::Value;

/// Result alias for scenario steps
pub type ContractResult<T> = Result<T, ContractError>;

/// Broad classification of a failure, used in the run report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced a response (refused, DNS, timeout)
    Transport,
    /// The backend answered, but not the way the contract says
    ContractViolation,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => f.write_str("transport failure"),
            Self::ContractViolation => f.write_str("contract violation"),
        }
    }
}

/// A scenario failure with the concrete mismatch
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Expected status {expected}, got {actual}. Body: {body}")]
    UnexpectedStatus {
        expected: u16,
        actual: u16,
        body: String,
    },

    #[error("Response body is not a JSON object: {0}")]
    MalformedPayload(String),

    #[error("Missing field `{0}`")]
    MissingField(String),

    #[error("Field `{field}`: expected {expected}, got {actual}")]
    FieldMismatch {
        field: String,
        expected: Value,
        actual: Value,
    },

    #[error("Field `{field}` must be a non-blank string, got {actual}")]
    BlankField { field: String, actual: Value },

    #[error("None of the fields {candidates:?} is present")]
    NoReplyText { candidates: Vec<&'static str> },
}

impl ContractError {
    /// Status mismatch, keeping at most a snippet of the body
    pub fn unexpected_status(expected: StatusCode, actual: StatusCode, body: &str) -> Self {
        Self::UnexpectedStatus {
            expected: expected.as_u16(),
            actual: actual.as_u16(),
            body: crate::payload::snippet(body),
        }
    }

    /// Classify this failure
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport { .. } => FailureKind::Transport,
            Self::UnexpectedStatus { .. }
            | Self::MalformedPayload(_)
            | Self::MissingField(_)
            | Self::FieldMismatch { .. }
            | Self::BlankField { .. }
            | Self::NoReplyText { .. } => FailureKind::ContractViolation,
        }
    }

    /// Whether the request timed out before a response arrived
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }
}
