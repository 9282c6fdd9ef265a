//! Tools domain module.
//!
//! Every Open WebUI operation is exposed as an MCP tool.
//!
//! ## Architecture
//!
//! - `definitions/` - tool implementations, one file per Open WebUI area
//! - `handlers.rs` - the `AdminTool` trait and generic metadata / invocation
//! - `arguments.rs` - schema-driven argument checks
//! - `envelope.rs` - the success / failure envelope every call returns
//! - `registry.rs` - the tool catalog and name-based dispatch
//! - `router.rs` - rmcp ToolRouter built from the catalog
//! - `error.rs` - tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Implement `AdminTool` for a unit struct in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Add an `entry::<MyTool>()` line to the catalog in `registry.rs`
//!
//! The router and both transports pick it up from the catalog.

mod arguments;
pub mod definitions;
mod envelope;
mod error;
mod handlers;
mod registry;
pub mod router;

pub use envelope::{ToolEnvelope, ToolFailure};
pub use error::{ErrorKind, ToolError};
pub use handlers::*;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
