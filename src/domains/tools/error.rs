//! Tool-specific error types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domains::openwebui::{ClientError, UpstreamCategory};

/// Error kind tag reported to the invoking assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or malformed tool argument; nothing was sent upstream.
    InvalidArgument,
    /// Open WebUI could not be reached or did not answer in time.
    Transport,
    /// Open WebUI refused the credential (401/403).
    PermissionDenied,
    /// The addressed resource does not exist (404).
    NotFound,
    /// Open WebUI answered with another error status.
    UpstreamFailure,
    /// Open WebUI answered 2xx with an unexpected body.
    ResponseShape,
}

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {}", describe_invalid(.names, .detail))]
    InvalidArguments { names: Vec<String>, detail: String },

    /// The Open WebUI call failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

fn describe_invalid(names: &[String], detail: &str) -> String {
    if names.is_empty() {
        detail.to_string()
    } else {
        format!("{} ({})", detail, names.join(", "))
    }
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error naming the offending arguments.
    pub fn invalid_arguments(names: Vec<String>, detail: impl Into<String>) -> Self {
        Self::InvalidArguments {
            names,
            detail: detail.into(),
        }
    }

    /// Shorthand for a single offending argument.
    pub fn invalid_argument(name: &str, detail: impl Into<String>) -> Self {
        Self::invalid_arguments(vec![name.to_string()], detail)
    }

    /// The tag reported in a failed envelope.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::InvalidArguments { .. } => ErrorKind::InvalidArgument,
            Self::Client(ClientError::InvalidRequest(_)) => ErrorKind::InvalidArgument,
            Self::Client(ClientError::Transport { .. }) => ErrorKind::Transport,
            Self::Client(ClientError::ResponseShape { .. }) => ErrorKind::ResponseShape,
            Self::Client(ClientError::Upstream(e)) => match e.category() {
                UpstreamCategory::PermissionDenied => ErrorKind::PermissionDenied,
                UpstreamCategory::NotFound => ErrorKind::NotFound,
                UpstreamCategory::Failure => ErrorKind::UpstreamFailure,
            },
        }
    }
}
