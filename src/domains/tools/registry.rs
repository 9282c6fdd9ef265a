//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The catalog of all available tools
//! - Name-based dispatch (used by the HTTP transport and the tests)
//! - Tool metadata for listing

use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool};
use tracing::warn;

use super::definitions::{
    AddUserToGroupTool, CreateGroupTool, CreateKnowledgeBaseTool, CreateModelTool,
    DeleteAllChatsTool, DeleteChatTool, DeleteGroupTool, DeleteKnowledgeBaseTool, DeleteModelTool,
    DeleteUserTool, GetChatTool, GetCurrentUserTool, GetFunctionTool, GetGroupTool,
    GetKnowledgeBaseTool, GetModelTool, GetSystemConfigTool, GetToolTool, GetUserTool,
    ListChatsTool, ListFunctionsTool, ListGroupsTool, ListKnowledgeBasesTool, ListModelsTool,
    ListToolsTool, ListUsersTool, RemoveUserFromGroupTool, UpdateGroupTool, UpdateModelTool,
    UpdateUserRoleTool,
};
use super::error::ToolError;
use super::handlers::{AdminTool, Dispatch, dispatch, to_tool};
use crate::domains::openwebui::OpenWebUiClient;

// ============================================================================
// Catalog
// ============================================================================

/// One registered tool: its metadata and its type-erased entry point.
#[derive(Clone, Copy)]
pub(crate) struct CatalogEntry {
    pub name: &'static str,
    pub tool: fn() -> Tool,
    pub dispatch: Dispatch,
}

fn entry<T: AdminTool>() -> CatalogEntry {
    CatalogEntry {
        name: T::NAME,
        tool: to_tool::<T>,
        dispatch: dispatch::<T>,
    }
}

/// Every tool, grouped by Open WebUI area.
pub(crate) fn catalog() -> Vec<CatalogEntry> {
    vec![
        // Users
        entry::<GetCurrentUserTool>(),
        entry::<ListUsersTool>(),
        entry::<GetUserTool>(),
        entry::<UpdateUserRoleTool>(),
        entry::<DeleteUserTool>(),
        // Groups
        entry::<ListGroupsTool>(),
        entry::<CreateGroupTool>(),
        entry::<GetGroupTool>(),
        entry::<UpdateGroupTool>(),
        entry::<AddUserToGroupTool>(),
        entry::<RemoveUserFromGroupTool>(),
        entry::<DeleteGroupTool>(),
        // Models
        entry::<ListModelsTool>(),
        entry::<GetModelTool>(),
        entry::<CreateModelTool>(),
        entry::<UpdateModelTool>(),
        entry::<DeleteModelTool>(),
        // Knowledge bases
        entry::<ListKnowledgeBasesTool>(),
        entry::<GetKnowledgeBaseTool>(),
        entry::<CreateKnowledgeBaseTool>(),
        entry::<DeleteKnowledgeBaseTool>(),
        // Chats
        entry::<ListChatsTool>(),
        entry::<GetChatTool>(),
        entry::<DeleteChatTool>(),
        entry::<DeleteAllChatsTool>(),
        // System
        entry::<ListToolsTool>(),
        entry::<GetToolTool>(),
        entry::<ListFunctionsTool>(),
        entry::<GetFunctionTool>(),
        entry::<GetSystemConfigTool>(),
    ]
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    client: Arc<OpenWebUiClient>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(client: Arc<OpenWebUiClient>) -> Self {
        Self { client }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        catalog().into_iter().map(|e| e.name).collect()
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// Both transports list tools from this catalog.
    pub fn get_all_tools() -> Vec<Tool> {
        catalog().into_iter().map(|e| (e.tool)()).collect()
    }

    /// Dispatch a tool call by name.
    ///
    /// `arguments` must be a JSON object or null. Only an unknown tool or
    /// non-object arguments are errors; everything else comes back as an
    /// enveloped `CallToolResult`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult, ToolError> {
        let Some(entry) = catalog().into_iter().find(|e| e.name == name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        let arguments: JsonObject = match arguments {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => JsonObject::new(),
            _ => {
                return Err(ToolError::invalid_arguments(
                    Vec::new(),
                    "arguments must be a JSON object",
                ));
            }
        };

        Ok((entry.dispatch)(&self.client, arguments).await)
    }
}
