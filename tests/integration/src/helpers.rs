//! Test helpers for integration tests
//!
//! Provides an in-process stub of the chat backend and runner
//! configurations pointing at it.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use contract_common::RunnerConfig;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{
    ChatRequest, ChatResponse, ErrorResponse, HealthResponse, BOTH_KEYS_REPLY,
    MISSING_API_KEY_ERROR, MISSING_MESSAGE_ERROR, UPSTREAM_ERROR,
};

/// How the stub answers `GET /health`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthMode {
    Healthy,
    /// `service` names something other than the backend
    WrongService,
    /// `ok` is the string "true" instead of a boolean
    OkAsString,
    /// 200 with a plain-text body
    NotJson,
    /// 503 with an error body
    Unavailable,
    Slow(Duration),
}

/// How the stub answers `POST /chat` with a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    /// Text under `reply`
    Reply,
    /// Text under `respuesta`
    Respuesta,
    /// Text under both keys, different per key
    BothKeys,
    /// Whitespace under `respuesta`, text under `reply`
    BlankRespuesta,
    /// Whitespace under `reply`
    BlankReply,
    /// 500, language-model key not configured
    MissingApiKey,
    /// 500, provider returned no choices
    UpstreamFailure,
    /// 500 with a non-JSON body
    PlainServerError,
    Slow(Duration),
}

/// How the stub answers `POST /chat` without a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// 400 with an error message
    Rejects,
    /// 200 as if the message were present
    Accepts,
    /// 400 with a whitespace error
    BlankError,
    /// 500 with an error body
    ServerError,
}

/// Complete behaviour of a stub backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Behavior {
    pub health: HealthMode,
    pub chat: ChatMode,
    pub validation: ValidationMode,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            health: HealthMode::Healthy,
            chat: ChatMode::Reply,
            validation: ValidationMode::Rejects,
        }
    }
}

impl Behavior {
    pub fn with_health(self, health: HealthMode) -> Self {
        Self { health, ..self }
    }

    pub fn with_chat(self, chat: ChatMode) -> Self {
        Self { chat, ..self }
    }

    pub fn with_validation(self, validation: ValidationMode) -> Self {
        Self { validation, ..self }
    }
}

struct StubState {
    behavior: Behavior,
    requests: AtomicUsize,
}

/// Stub backend instance that manages lifecycle
pub struct StubBackend {
    pub addr: SocketAddr,
    state: Arc<StubState>,
    handle: JoinHandle<()>,
}

impl StubBackend {
    /// Start a stub with the default, contract-abiding behaviour
    pub async fn start() -> Result<Self> {
        Self::start_with(Behavior::default()).await
    }

    /// Start a stub with custom behaviour
    pub async fn start_with(behavior: Behavior) -> Result<Self> {
        let state = Arc::new(StubState {
            behavior,
            requests: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/health", get(health))
            .route("/chat", post(chat))
            .with_state(Arc::clone(&state));

        // Bind before spawning so requests queue until the server polls
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// Get base URL for the stub
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Runner configuration pointing at this stub
    pub fn config(&self) -> Result<RunnerConfig> {
        Ok(RunnerConfig::from_base_url(Some(self.base_url()))?)
    }

    /// Runner configuration with every timeout set to `timeout`
    pub fn config_with_timeout(&self, timeout: Duration) -> Result<RunnerConfig> {
        Ok(RunnerConfig {
            health_timeout: timeout,
            chat_timeout: timeout,
            validation_timeout: timeout,
            ..self.config()?
        })
    }

    /// Number of requests the stub has received
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Runner configuration for a port nothing listens on
pub async fn unreachable_config() -> Result<RunnerConfig> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    drop(listener);

    Ok(RunnerConfig::from_base_url(Some(format!("http://{addr}")))?)
}

async fn health(State(stub): State<Arc<StubState>>) -> Response {
    stub.requests.fetch_add(1, Ordering::SeqCst);

    match stub.behavior.health {
        HealthMode::Healthy => Json(HealthResponse::healthy()).into_response(),
        HealthMode::WrongService => Json(HealthResponse {
            ok: true,
            service: "frontend".to_string(),
        })
        .into_response(),
        HealthMode::OkAsString => Json(json!({"ok": "true", "service": "backend"})).into_response(),
        HealthMode::NotJson => "OK".into_response(),
        HealthMode::Unavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("starting")),
        )
            .into_response(),
        HealthMode::Slow(delay) => {
            tokio::time::sleep(delay).await;
            Json(HealthResponse::healthy()).into_response()
        }
    }
}

async fn chat(State(stub): State<Arc<StubState>>, body: Bytes) -> Response {
    stub.requests.fetch_add(1, Ordering::SeqCst);

    let request: ChatRequest = serde_json::from_slice(&body).unwrap_or_default();
    match request.message.filter(|message| !message.is_empty()) {
        None => missing_message(stub.behavior.validation),
        Some(message) => reply(stub.behavior.chat, &message).await,
    }
}

fn missing_message(mode: ValidationMode) -> Response {
    match mode {
        ValidationMode::Rejects => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(MISSING_MESSAGE_ERROR)),
        )
            .into_response(),
        ValidationMode::Accepts => Json(ChatResponse::reply("¿En qué te ayudo?")).into_response(),
        ValidationMode::BlankError => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new("  "))).into_response()
        }
        ValidationMode::ServerError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(MISSING_API_KEY_ERROR)),
        )
            .into_response(),
    }
}

async fn reply(mode: ChatMode, message: &str) -> Response {
    let text = format!("Recibido: \"{message}\"");
    match mode {
        ChatMode::Reply => Json(ChatResponse::reply(&text)).into_response(),
        ChatMode::Respuesta => Json(ChatResponse::respuesta(&text)).into_response(),
        ChatMode::BothKeys => Json(ChatResponse {
            respuesta: Some(text),
            reply: Some(BOTH_KEYS_REPLY.to_string()),
        })
        .into_response(),
        ChatMode::BlankRespuesta => Json(ChatResponse {
            respuesta: Some("   ".to_string()),
            reply: Some(text),
        })
        .into_response(),
        ChatMode::BlankReply => Json(ChatResponse::reply(" \n ")).into_response(),
        ChatMode::MissingApiKey => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(MISSING_API_KEY_ERROR)),
        )
            .into_response(),
        ChatMode::UpstreamFailure => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(UPSTREAM_ERROR)),
        )
            .into_response(),
        ChatMode::PlainServerError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
        ChatMode::Slow(delay) => {
            tokio::time::sleep(delay).await;
            Json(ChatResponse::reply(&text)).into_response()
        }
    }
}
