//! JSON-RPC over HTTP, end to end against a mock upstream.
//!
//! Run with: cargo test --features http --test http_test

#![cfg(feature = "http")]

mod common;

use common::{DEFAULT_KEY, MockOpenWebUi};
use openwebui_mcp_server::core::transport::http::{JsonRpcRequest, process_request};
use openwebui_mcp_server::core::{Config, McpServer};
use serde_json::{Value, json};
use std::time::Duration;

fn server_for(mock: &MockOpenWebUi) -> McpServer {
    McpServer::with_client(Config::default(), mock.client(Duration::from_secs(5)))
}

fn tools_call(name: &str, arguments: Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!(7)),
        method: "tools/call".to_string(),
        params: Some(json!({"name": name, "arguments": arguments})),
    }
}

async fn authorization_sent(arguments: Value, bearer: Option<&str>) -> Option<String> {
    let mock = MockOpenWebUi::spawn().await;
    mock.reply_json(200, json!([]));
    let server = server_for(&mock);

    let response = process_request(&server, tools_call("list_groups", arguments), bearer).await;
    let result = response.result.expect("tools/call failed");
    assert_eq!(result["structuredContent"]["success"], true);

    mock.last_request().authorization
}

#[tokio::test]
async fn test_bearer_header_replaces_null_api_key() {
    let sent = authorization_sent(json!({"api_key": null}), Some("header-token")).await;
    assert_eq!(sent.as_deref(), Some("Bearer header-token"));
}

#[tokio::test]
async fn test_bearer_header_replaces_blank_api_key() {
    let sent = authorization_sent(json!({"api_key": "   "}), Some("header-token")).await;
    assert_eq!(sent.as_deref(), Some("Bearer header-token"));
}

#[tokio::test]
async fn test_explicit_api_key_beats_bearer_header() {
    let sent = authorization_sent(json!({"api_key": "explicit"}), Some("header-token")).await;
    assert_eq!(sent.as_deref(), Some("Bearer explicit"));
}

#[tokio::test]
async fn test_default_key_without_header() {
    let sent = authorization_sent(json!({}), None).await;
    assert_eq!(
        sent.as_deref(),
        Some(format!("Bearer {}", DEFAULT_KEY).as_str())
    );
}
