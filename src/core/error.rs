//! Error types and handling for the MCP server.
//!
//! This module defines the unified error type returned while the server is
//! configured and started.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the Open WebUI client (e.g. an unusable base URL).
    #[error("Open WebUI client error: {0}")]
    Client(#[from] crate::domains::openwebui::ClientError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::openwebui::ClientError;

    #[test]
    fn test_error_messages() {
        let err = Error::config("OPENWEBUI_URL is required");
        assert_eq!(
            err.to_string(),
            "Configuration error: OPENWEBUI_URL is required"
        );

        let err: Error = ClientError::invalid_request("invalid base URL 'x'").into();
        assert!(matches!(err, Error::Client(_)));
        assert!(err.to_string().starts_with("Open WebUI client error"));
    }
}
