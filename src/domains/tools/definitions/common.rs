//! Shared parameter types and checks for the tool definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::openwebui::models::Deletion;
use crate::domains::tools::ToolError;

/// Parameters of tools that take nothing but the optional `api_key`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Result of a delete operation.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DeletionResult {
    /// Identifier of the deleted resource (absent for bulk deletes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// What Open WebUI reported.
    pub deleted: bool,
}

impl DeletionResult {
    pub fn new(id: impl Into<String>, deletion: Deletion) -> Self {
        Self {
            id: Some(id.into()),
            deleted: deletion.0,
        }
    }

    pub fn bulk(deletion: Deletion) -> Self {
        Self {
            id: None,
            deleted: deletion.0,
        }
    }

    pub fn summary(&self, what: &str) -> String {
        match (&self.id, self.deleted) {
            (Some(id), true) => format!("Deleted {} '{}'", what, id),
            (Some(id), false) => format!("Open WebUI did not delete {} '{}'", what, id),
            (None, true) => format!("Deleted all {}", what),
            (None, false) => format!("Open WebUI did not delete the {}", what),
        }
    }
}

/// Identifiers become path segments: blank or dot-only values would address
/// a different endpoint.
pub fn require_id(name: &str, value: &str) -> Result<(), ToolError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ToolError::invalid_argument(name, "must not be blank"));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(ToolError::invalid_argument(name, "is not a valid identifier"));
    }
    Ok(())
}

pub fn require_text(name: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::invalid_argument(name, "must not be blank"));
    }
    Ok(())
}
