//! Result envelope returned by every tool.
//!
//! A call always produces a `CallToolResult` whose structured content is a
//! [`ToolEnvelope`]: either `{"success": true, "data": ...}` or
//! `{"success": false, "error": {"kind", "message", ...}}`. The text content
//! carries a one-line summary so clients that ignore structured content still
//! see what happened.

use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::{ErrorKind, ToolError};
use crate::domains::openwebui::ClientError;

/// Failure details carried in a failed envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolFailure {
    /// Machine-readable error class.
    pub kind: ErrorKind,

    /// Human-readable message, including the identifier involved when there is one.
    pub message: String,

    /// Upstream HTTP status, when Open WebUI answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Set when the upstream did not answer within the configured timeout.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub timed_out: bool,
}

impl ToolFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            timed_out: false,
        }
    }
}

impl From<&ToolError> for ToolFailure {
    fn from(err: &ToolError) -> Self {
        let mut failure = Self::new(err.kind(), err.to_string());
        if let ToolError::Client(client_err) = err {
            failure.status = client_err.status();
            if let ClientError::Transport { timed_out, .. } = client_err {
                failure.timed_out = *timed_out;
            }
        }
        failure
    }
}

/// Uniform tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolEnvelope {
    /// Whether the operation succeeded.
    pub success: bool,

    /// Result data from Open WebUI (success only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Failure details (failure only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolFailure>,
}

impl ToolEnvelope {
    /// Create a successful envelope.
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create a failed envelope.
    pub fn failure(failure: ToolFailure) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(failure),
        }
    }

    /// Convert into the MCP result, with `summary` as the first text block.
    pub fn into_call_result(self, summary: impl Into<String>) -> CallToolResult {
        let mut content = vec![Content::text(summary.into())];
        if let Some(pretty) = self
            .data
            .as_ref()
            .and_then(|data| serde_json::to_string_pretty(data).ok())
        {
            content.push(Content::text(pretty));
        }

        let is_error = !self.success;
        CallToolResult {
            content,
            structured_content: serde_json::to_value(&self).ok(),
            is_error: Some(is_error),
            meta: None,
        }
    }
}

impl From<&ToolError> for ToolEnvelope {
    fn from(err: &ToolError) -> Self {
        Self::failure(ToolFailure::from(err))
    }
}
