//! Domains module containing business logic organized by bounded contexts.
//!
//! - `openwebui` - the upstream REST API
//! - `tools` - the MCP tool surface built on top of it

pub mod openwebui;
pub mod tools;
