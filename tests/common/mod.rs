//! Shared integration test utilities.
//!
//! `MockOpenWebUi` is a throwaway axum server standing in for an Open WebUI
//! instance. Every request is recorded; the reply is whatever the test
//! configured last.

#![allow(dead_code)]

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use openwebui_mcp_server::domains::openwebui::{Credential, OpenWebUiClient};
use openwebui_mcp_server::domains::tools::{ToolEnvelope, ToolRegistry};
use rmcp::model::CallToolResult;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const DEFAULT_KEY: &str = "default-key";

/// One request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Reply {
    Json(StatusCode, Value),
    Raw(StatusCode, String),
    /// Answer 200 with the request body, merged with the given fields.
    Echo(Value),
}

struct MockState {
    reply: Mutex<Reply>,
    delay: Mutex<Option<Duration>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Mock Open WebUI bound to an ephemeral local port.
pub struct MockOpenWebUi {
    pub base_url: String,
    state: Arc<MockState>,
    _shutdown_tx: oneshot::Sender<()>,
}

impl MockOpenWebUi {
    /// Spawn the mock. It answers `200 {}` until told otherwise.
    pub async fn spawn() -> Self {
        let state = Arc::new(MockState {
            reply: Mutex::new(Reply::Json(StatusCode::OK, serde_json::json!({}))),
            delay: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(handle_any)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock listener");
        let addr = listener.local_addr().expect("Failed to get local address");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .ok();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            _shutdown_tx: shutdown_tx,
        }
    }

    pub fn reply_json(&self, status: u16, body: Value) {
        *self.state.reply.lock().unwrap() = Reply::Json(status_code(status), body);
    }

    pub fn reply_raw(&self, status: u16, body: &str) {
        *self.state.reply.lock().unwrap() = Reply::Raw(status_code(status), body.to_string());
    }

    pub fn echo_with(&self, extra: Value) {
        *self.state.reply.lock().unwrap() = Reply::Echo(extra);
    }

    pub fn delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = Some(delay);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("mock received no request")
    }

    /// Client pointed at the mock, with the default credential.
    pub fn client(&self, timeout: Duration) -> Arc<OpenWebUiClient> {
        let client = OpenWebUiClient::new(
            &self.base_url,
            Some(Credential::new(DEFAULT_KEY)),
            timeout,
        )
        .expect("Failed to build client");
        Arc::new(client)
    }

    pub fn registry(&self) -> ToolRegistry {
        ToolRegistry::new(self.client(Duration::from_secs(5)))
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).expect("invalid status code")
}

async fn handle_any(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<Value>(&body).ok()
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });

    let delay = *state.delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let reply = state.reply.lock().unwrap().clone();
    match reply {
        Reply::Json(status, value) => (status, axum::Json(value)).into_response(),
        Reply::Raw(status, text) => (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            text,
        )
            .into_response(),
        Reply::Echo(extra) => {
            let mut echoed = body.unwrap_or_else(|| serde_json::json!({}));
            if let (Some(target), Some(fields)) = (echoed.as_object_mut(), extra.as_object()) {
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
            }
            (StatusCode::OK, axum::Json(echoed)).into_response()
        }
    }
}

/// Decode the envelope carried in a tool result.
pub fn envelope(result: &CallToolResult) -> ToolEnvelope {
    let structured = result
        .structured_content
        .clone()
        .expect("tool result has no structured content");
    serde_json::from_value(structured).expect("structured content is not an envelope")
}

/// Call a tool through the registry and decode its envelope.
pub async fn call(registry: &ToolRegistry, name: &str, arguments: Value) -> ToolEnvelope {
    let result = registry
        .call_tool(name, arguments)
        .await
        .expect("tool call failed at the protocol level");
    let envelope = envelope(&result);
    assert_eq!(result.is_error, Some(!envelope.success));
    envelope
}
