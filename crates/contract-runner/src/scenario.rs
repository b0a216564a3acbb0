//! Contract scenarios
//!
//! A scenario is one request plus the checks applied to its response.
//! Scenarios are independent: none reads the result of another, so they can
//! run in any order against the same session.

use std::fmt;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ContractResult;
use crate::payload::{self, REPLY_KEYS};
use crate::report::Outcome;
use crate::session::{expect_payload, HttpSession};
use contract_common::RunnerConfig;

/// Message sent by the chat-exchange scenario
pub const GREETING: &str = "Hola";

/// Value the backend reports under `service` on `/health`
pub const SERVICE_NAME: &str = "backend";

/// HTTP method of a scenario request; a POST carries its JSON body
#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    Get,
    Post(Value),
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post(_) => f.write_str("POST"),
        }
    }
}

/// The request half of a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRequest {
    pub method: Method,
    pub path: &'static str,
    pub timeout: Duration,
}

impl ScenarioRequest {
    /// Send this request over the session
    pub async fn send(&self, session: &HttpSession) -> ContractResult<Response> {
        match &self.method {
            Method::Get => session.get(self.path, self.timeout).await,
            Method::Post(body) => session.post(self.path, body, self.timeout).await,
        }
    }
}

/// Every contract check the runner knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// `GET /health` answers `{"ok": true, "service": "backend"}`
    Health,
    /// `POST /chat` with a message answers with reply text
    ChatReply,
    /// `POST /chat` without `message` is rejected with 400
    ChatMissingMessage,
}

impl Scenario {
    /// All scenarios, in report order
    pub const ALL: [Scenario; 3] = [Self::Health, Self::ChatReply, Self::ChatMissingMessage];

    /// Stable identifier used in logs and reports
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::ChatReply => "chat_reply",
            Self::ChatMissingMessage => "chat_missing_message",
        }
    }

    /// Describe the request this scenario sends
    #[must_use]
    pub fn request(self, config: &RunnerConfig) -> ScenarioRequest {
        match self {
            Self::Health => ScenarioRequest {
                method: Method::Get,
                path: "/health",
                timeout: config.health_timeout,
            },
            Self::ChatReply => ScenarioRequest {
                method: Method::Post(json!({ "message": GREETING })),
                path: "/chat",
                timeout: config.chat_timeout,
            },
            Self::ChatMissingMessage => ScenarioRequest {
                method: Method::Post(json!({})),
                path: "/chat",
                timeout: config.validation_timeout,
            },
        }
    }

    /// Send the request and check the response
    ///
    /// `Err` is a failure. `Ok` is either a pass or, for the chat exchange
    /// only, a skip when the backend lacks its upstream credential.
    pub async fn run(self, session: &HttpSession) -> ContractResult<Outcome> {
        let request = self.request(session.config());
        let response = request.send(session).await?;
        debug!(
            scenario = self.name(),
            method = %request.method,
            path = request.path,
            status = %response.status(),
            "response received"
        );

        match self {
            Self::Health => check_health(response).await,
            Self::ChatReply => check_chat_reply(response).await,
            Self::ChatMissingMessage => check_missing_message(response).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

async fn check_health(response: Response) -> ContractResult<Outcome> {
    let body = expect_payload(response, StatusCode::OK).await?;
    payload::expect_field(&body, "ok", &Value::Bool(true))?;
    payload::expect_field(&body, "service", &json!(SERVICE_NAME))?;
    Ok(Outcome::Passed)
}

async fn check_chat_reply(response: Response) -> ContractResult<Outcome> {
    // 500 here means the backend has no language-model credential.
    if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
        let detail = response.text().await.ok().and_then(|body| {
            payload::decode(&body)
                .ok()
                .and_then(|map| map.get("error").and_then(Value::as_str).map(str::to_string))
        });
        let reason = match detail {
            Some(detail) => format!("backend has no upstream credential configured ({detail})"),
            None => "backend has no upstream credential configured".to_string(),
        };
        return Ok(Outcome::Skipped(reason));
    }

    let body = expect_payload(response, StatusCode::OK).await?;
    let (key, text) = payload::first_present(&body, &REPLY_KEYS)?;
    debug!(key, chars = text.chars().count(), "reply text found");
    Ok(Outcome::Passed)
}

async fn check_missing_message(response: Response) -> ContractResult<Outcome> {
    let body = expect_payload(response, StatusCode::BAD_REQUEST).await?;
    payload::non_blank_str(&body, "error")?;
    Ok(Outcome::Passed)
}
