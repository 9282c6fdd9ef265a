//! Group management tools.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{DeletionResult, NoParams, require_id, require_text};
use crate::domains::openwebui::models::Group;
use crate::domains::openwebui::{ClientError, Credential, OpenWebUiClient};
use crate::domains::tools::{AdminTool, PermissionTier, ToolEffect, ToolError};

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GroupIdParams {
    /// ID of the group.
    pub group_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateGroupParams {
    /// Name of the new group.
    pub name: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateGroupParams {
    /// ID of the group.
    pub group_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameters for membership changes.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GroupMemberParams {
    /// ID of the group.
    pub group_id: String,

    /// ID of the user to add or remove.
    pub user_id: String,
}

impl GroupMemberParams {
    fn validate(&self) -> Result<(), ToolError> {
        require_id("group_id", &self.group_id)?;
        require_id("user_id", &self.user_id)
    }
}

fn describe(group: &Group) -> String {
    format!(
        "Group '{}' ({}) with {} members",
        group.name,
        group.id,
        group.user_ids.len()
    )
}

// ============================================================================
// Tool Definitions
// ============================================================================

pub struct ListGroupsTool;

#[async_trait]
impl AdminTool for ListGroupsTool {
    const NAME: &'static str = "list_groups";
    const DESCRIPTION: &'static str = "List all user groups.";
    const TIER: PermissionTier = PermissionTier::Any;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = NoParams;
    type Output = Vec<Group>;

    async fn call(
        client: &OpenWebUiClient,
        _params: NoParams,
        credential: Option<&Credential>,
    ) -> Result<Vec<Group>, ClientError> {
        client.list_groups(credential).await
    }

    fn summarize(groups: &Vec<Group>) -> String {
        format!("Found {} groups", groups.len())
    }
}

pub struct CreateGroupTool;

#[async_trait]
impl AdminTool for CreateGroupTool {
    const NAME: &'static str = "create_group";
    const DESCRIPTION: &'static str =
        "Create a new user group. Groups are used to share models, knowledge bases and tools.";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Write;

    type Params = CreateGroupParams;
    type Output = Group;

    fn validate(params: &CreateGroupParams) -> Result<(), ToolError> {
        require_text("name", &params.name)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: CreateGroupParams,
        credential: Option<&Credential>,
    ) -> Result<Group, ClientError> {
        let description = params.description.unwrap_or_default();
        client
            .create_group(&params.name, &description, credential)
            .await
    }

    fn summarize(group: &Group) -> String {
        format!("Created group '{}' ({})", group.name, group.id)
    }
}

pub struct GetGroupTool;

#[async_trait]
impl AdminTool for GetGroupTool {
    const NAME: &'static str = "get_group";
    const DESCRIPTION: &'static str = "Get details of a group, including its member IDs.";
    const TIER: PermissionTier = PermissionTier::Any;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = GroupIdParams;
    type Output = Group;

    fn validate(params: &GroupIdParams) -> Result<(), ToolError> {
        require_id("group_id", &params.group_id)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: GroupIdParams,
        credential: Option<&Credential>,
    ) -> Result<Group, ClientError> {
        client.get_group(&params.group_id, credential).await
    }

    fn summarize(group: &Group) -> String {
        describe(group)
    }
}

pub struct UpdateGroupTool;

#[async_trait]
impl AdminTool for UpdateGroupTool {
    const NAME: &'static str = "update_group";
    const DESCRIPTION: &'static str =
        "Update a group's name and/or description. At least one of them must be given.";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Write;

    type Params = UpdateGroupParams;
    type Output = Group;

    fn validate(params: &UpdateGroupParams) -> Result<(), ToolError> {
        require_id("group_id", &params.group_id)?;
        if params.name.is_none() && params.description.is_none() {
            return Err(ToolError::invalid_arguments(
                vec!["name".to_string(), "description".to_string()],
                "at least one field to update is required",
            ));
        }
        if let Some(name) = &params.name {
            require_text("name", name)?;
        }
        Ok(())
    }

    async fn call(
        client: &OpenWebUiClient,
        params: UpdateGroupParams,
        credential: Option<&Credential>,
    ) -> Result<Group, ClientError> {
        client
            .update_group(
                &params.group_id,
                params.name.as_deref(),
                params.description.as_deref(),
                credential,
            )
            .await
    }

    fn summarize(group: &Group) -> String {
        format!("Updated group '{}' ({})", group.name, group.id)
    }
}

pub struct AddUserToGroupTool;

#[async_trait]
impl AdminTool for AddUserToGroupTool {
    const NAME: &'static str = "add_user_to_group";
    const DESCRIPTION: &'static str = "Add a user to a group.";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Write;

    type Params = GroupMemberParams;
    type Output = Group;

    fn validate(params: &GroupMemberParams) -> Result<(), ToolError> {
        params.validate()
    }

    async fn call(
        client: &OpenWebUiClient,
        params: GroupMemberParams,
        credential: Option<&Credential>,
    ) -> Result<Group, ClientError> {
        client
            .add_user_to_group(&params.group_id, &params.user_id, credential)
            .await
    }

    fn summarize(group: &Group) -> String {
        describe(group)
    }
}

pub struct RemoveUserFromGroupTool;

#[async_trait]
impl AdminTool for RemoveUserFromGroupTool {
    const NAME: &'static str = "remove_user_from_group";
    const DESCRIPTION: &'static str = "Remove a user from a group.";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Write;

    type Params = GroupMemberParams;
    type Output = Group;

    fn validate(params: &GroupMemberParams) -> Result<(), ToolError> {
        params.validate()
    }

    async fn call(
        client: &OpenWebUiClient,
        params: GroupMemberParams,
        credential: Option<&Credential>,
    ) -> Result<Group, ClientError> {
        client
            .remove_user_from_group(&params.group_id, &params.user_id, credential)
            .await
    }

    fn summarize(group: &Group) -> String {
        describe(group)
    }
}

pub struct DeleteGroupTool;

#[async_trait]
impl AdminTool for DeleteGroupTool {
    const NAME: &'static str = "delete_group";
    const DESCRIPTION: &'static str = "Delete a group. Its members keep their accounts.";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Destructive;

    type Params = GroupIdParams;
    type Output = DeletionResult;

    fn validate(params: &GroupIdParams) -> Result<(), ToolError> {
        require_id("group_id", &params.group_id)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: GroupIdParams,
        credential: Option<&Credential>,
    ) -> Result<DeletionResult, ClientError> {
        let deletion = client.delete_group(&params.group_id, credential).await?;
        Ok(DeletionResult::new(params.group_id, deletion))
    }

    fn summarize(result: &DeletionResult) -> String {
        result.summary("group")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_group_needs_a_field() {
        let params = UpdateGroupParams {
            group_id: "g1".to_string(),
            name: None,
            description: None,
        };
        let err = UpdateGroupTool::validate(&params).unwrap_err();
        assert!(err.to_string().contains("at least one field"));

        let params = UpdateGroupParams {
            description: Some("Platform team".to_string()),
            ..params
        };
        assert!(UpdateGroupTool::validate(&params).is_ok());
    }

    #[test]
    fn test_member_params_need_both_ids() {
        let params = GroupMemberParams {
            group_id: "g1".to_string(),
            user_id: "".to_string(),
        };
        let err = AddUserToGroupTool::validate(&params).unwrap_err();
        assert!(err.to_string().contains("user_id"));
    }

    #[test]
    fn test_create_group_rejects_blank_name() {
        let params = CreateGroupParams {
            name: "  ".to_string(),
            description: None,
        };
        assert!(CreateGroupTool::validate(&params).is_err());
    }
}
