//! User management tools.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{DeletionResult, NoParams, require_id};
use crate::domains::openwebui::models::{Role, SessionUser, User, UserPage};
use crate::domains::openwebui::{ClientError, Credential, OpenWebUiClient};
use crate::domains::tools::{AdminTool, PermissionTier, ToolEffect, ToolError};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for tools addressing a single user.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UserIdParams {
    /// ID of the user.
    pub user_id: String,
}

/// Parameters for the role update tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateUserRoleParams {
    /// ID of the user.
    pub user_id: String,

    /// New role: `admin`, `user` or `pending`.
    pub role: Role,
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Returns the account behind the credential in use.
pub struct GetCurrentUserTool;

#[async_trait]
impl AdminTool for GetCurrentUserTool {
    const NAME: &'static str = "get_current_user";
    const DESCRIPTION: &'static str =
        "Get the profile of the authenticated user: id, name, email, role and permissions.";
    const TIER: PermissionTier = PermissionTier::Any;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = NoParams;
    type Output = SessionUser;

    async fn call(
        client: &OpenWebUiClient,
        _params: NoParams,
        credential: Option<&Credential>,
    ) -> Result<SessionUser, ClientError> {
        client.get_current_user(credential).await
    }

    fn summarize(user: &SessionUser) -> String {
        format!("Authenticated as {} <{}> ({})", user.name, user.email, user.role)
    }
}

pub struct ListUsersTool;

#[async_trait]
impl AdminTool for ListUsersTool {
    const NAME: &'static str = "list_users";
    const DESCRIPTION: &'static str = "List all users of the Open WebUI instance.";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = NoParams;
    type Output = UserPage;

    async fn call(
        client: &OpenWebUiClient,
        _params: NoParams,
        credential: Option<&Credential>,
    ) -> Result<UserPage, ClientError> {
        client.list_users(credential).await
    }

    fn summarize(page: &UserPage) -> String {
        format!("Found {} users", page.total)
    }
}

pub struct GetUserTool;

#[async_trait]
impl AdminTool for GetUserTool {
    const NAME: &'static str = "get_user";
    const DESCRIPTION: &'static str = "Get details of a specific user by ID.";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = UserIdParams;
    type Output = User;

    fn validate(params: &UserIdParams) -> Result<(), ToolError> {
        require_id("user_id", &params.user_id)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: UserIdParams,
        credential: Option<&Credential>,
    ) -> Result<User, ClientError> {
        client.get_user(&params.user_id, credential).await
    }

    fn summarize(user: &User) -> String {
        format!("User {} <{}> ({})", user.name, user.email, user.role)
    }
}

/// Changes the role of an account.
pub struct UpdateUserRoleTool;

#[async_trait]
impl AdminTool for UpdateUserRoleTool {
    const NAME: &'static str = "update_user_role";
    const DESCRIPTION: &'static str =
        "Change a user's role to 'admin', 'user' or 'pending'. Pending users cannot use the instance until approved.";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Write;

    type Params = UpdateUserRoleParams;
    type Output = User;

    fn validate(params: &UpdateUserRoleParams) -> Result<(), ToolError> {
        require_id("user_id", &params.user_id)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: UpdateUserRoleParams,
        credential: Option<&Credential>,
    ) -> Result<User, ClientError> {
        client
            .update_user_role(&params.user_id, params.role, credential)
            .await
    }

    fn summarize(user: &User) -> String {
        format!("User {} now has role {}", user.id, user.role)
    }
}

pub struct DeleteUserTool;

#[async_trait]
impl AdminTool for DeleteUserTool {
    const NAME: &'static str = "delete_user";
    const DESCRIPTION: &'static str =
        "Permanently delete a user account. This cannot be undone.";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Destructive;

    type Params = UserIdParams;
    type Output = DeletionResult;

    fn validate(params: &UserIdParams) -> Result<(), ToolError> {
        require_id("user_id", &params.user_id)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: UserIdParams,
        credential: Option<&Credential>,
    ) -> Result<DeletionResult, ClientError> {
        let deletion = client.delete_user(&params.user_id, credential).await?;
        Ok(DeletionResult::new(params.user_id, deletion))
    }

    fn summarize(result: &DeletionResult) -> String {
        result.summary("user")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_user_id_rejected() {
        let params = UserIdParams {
            user_id: " ".to_string(),
        };
        assert!(GetUserTool::validate(&params).is_err());
        assert!(DeleteUserTool::validate(&params).is_err());
    }

    #[test]
    fn test_role_param_deserializes() {
        let params: UpdateUserRoleParams =
            serde_json::from_value(serde_json::json!({"user_id": "u1", "role": "pending"})).unwrap();
        assert_eq!(params.role, Role::Pending);
        assert!(
            serde_json::from_value::<UpdateUserRoleParams>(
                serde_json::json!({"user_id": "u1", "role": "owner"})
            )
            .is_err()
        );
    }
}
