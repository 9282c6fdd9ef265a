//! Errors raised by the Open WebUI client.

use thiserror::Error;

/// How an upstream non-2xx response is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamCategory {
    /// 401 or 403.
    PermissionDenied,
    /// 404.
    NotFound,
    /// Any other non-2xx status.
    Failure,
}

/// Open WebUI answered with a non-2xx status.
#[derive(Debug, Clone, Error)]
#[error("{method} {path} returned {status}: {message}")]
pub struct UpstreamError {
    /// HTTP method of the failed request.
    pub method: String,
    /// Request path, including identifiers.
    pub path: String,
    /// HTTP status code.
    pub status: u16,
    /// Message extracted from the response body.
    pub message: String,
}

impl UpstreamError {
    pub fn category(&self) -> UpstreamCategory {
        match self.status {
            401 | 403 => UpstreamCategory::PermissionDenied,
            404 => UpstreamCategory::NotFound,
            _ => UpstreamCategory::Failure,
        }
    }
}

/// Errors that can occur while talking to Open WebUI.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be built (bad base URL, unusable path segment).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No response was received.
    #[error("{}", transport_message(.message, .timed_out))]
    Transport { message: String, timed_out: bool },

    /// Upstream answered with a non-2xx status.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Upstream answered 2xx but the body did not have the expected shape.
    #[error("Unexpected response from {path}: {message}")]
    ResponseShape { path: String, message: String },
}

fn transport_message(message: &str, timed_out: &bool) -> String {
    if *timed_out {
        format!("Open WebUI did not respond in time: {}", message)
    } else {
        format!("Open WebUI is unreachable: {}", message)
    }
}

impl ClientError {
    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a response shape error.
    pub fn response_shape(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::ResponseShape {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Map a reqwest failure that happened before a status was received.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        let timed_out = err.is_timeout();
        let message = if timed_out {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("connection failed ({})", err)
        } else {
            err.to_string()
        };
        Self::Transport { message, timed_out }
    }

    /// HTTP status of an upstream error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream(e) => Some(e.status),
            _ => None,
        }
    }
}
