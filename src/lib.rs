//! Open WebUI MCP Server Library
//!
//! An MCP server that lets an AI assistant administer an Open WebUI instance
//! through its REST API: users, groups, models, knowledge bases, chats,
//! tools, functions and configuration.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server handler and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **openwebui**: typed client for the Open WebUI REST API
//!   - **tools**: MCP tools wrapping each client operation
//!
//! # Example
//!
//! ```rust,no_run
//! use openwebui_mcp_server::{core::Config, core::McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
