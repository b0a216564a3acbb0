//! HTTP session shared by every scenario of a run
//!
//! Wraps one `reqwest::Client` so connections are reused across scenarios.
//! The client is released when the session is dropped.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::error::{ContractError, ContractResult};
use crate::payload::{self, Payload};
use contract_common::RunnerConfig;

/// Connection-reusing client bound to one backend base URL
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
    config: RunnerConfig,
}

impl HttpSession {
    /// Open a session against the configured backend
    pub fn open(config: &RunnerConfig) -> ContractResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| ContractError::Transport {
                method: "BUILD",
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Configuration the session was opened with
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Make a GET request
    pub async fn get(&self, path: &str, timeout: Duration) -> ContractResult<Response> {
        let url = self.config.url(path);
        debug!(%url, ?timeout, "GET");

        self.client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| ContractError::Transport {
                method: "GET",
                url,
                source,
            })
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        timeout: Duration,
    ) -> ContractResult<Response> {
        let url = self.config.url(path);
        debug!(%url, ?timeout, "POST");

        self.client
            .post(&url)
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| ContractError::Transport {
                method: "POST",
                url,
                source,
            })
    }
}

/// Assert response status and decode the JSON object body
pub async fn expect_payload(response: Response, expected_status: StatusCode) -> ContractResult<Payload> {
    let status = response.status();
    let body = read_body(response).await?;

    if status != expected_status {
        return Err(ContractError::unexpected_status(expected_status, status, &body));
    }

    payload::decode(&body)
}

async fn read_body(response: Response) -> ContractResult<String> {
    let url = response.url().to_string();
    response.text().await.map_err(|source| ContractError::Transport {
        method: "READ",
        url,
        source,
    })
}
