//! Chat tools. Open WebUI scopes these to the caller's own chats.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{DeletionResult, NoParams, require_id};
use crate::domains::openwebui::models::{Chat, ChatSummary};
use crate::domains::openwebui::{ClientError, Credential, OpenWebUiClient};
use crate::domains::tools::{AdminTool, PermissionTier, ToolEffect, ToolError};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ChatIdParams {
    /// ID of the chat.
    pub chat_id: String,
}

pub struct ListChatsTool;

#[async_trait]
impl AdminTool for ListChatsTool {
    const NAME: &'static str = "list_chats";
    const DESCRIPTION: &'static str = "List the caller's chats (id, title, timestamps).";
    const TIER: PermissionTier = PermissionTier::Own;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = NoParams;
    type Output = Vec<ChatSummary>;

    async fn call(
        client: &OpenWebUiClient,
        _params: NoParams,
        credential: Option<&Credential>,
    ) -> Result<Vec<ChatSummary>, ClientError> {
        client.list_chats(credential).await
    }

    fn summarize(chats: &Vec<ChatSummary>) -> String {
        format!("Found {} chats", chats.len())
    }
}

pub struct GetChatTool;

#[async_trait]
impl AdminTool for GetChatTool {
    const NAME: &'static str = "get_chat";
    const DESCRIPTION: &'static str = "Get a chat with its full message history.";
    const TIER: PermissionTier = PermissionTier::Own;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = ChatIdParams;
    type Output = Chat;

    fn validate(params: &ChatIdParams) -> Result<(), ToolError> {
        require_id("chat_id", &params.chat_id)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: ChatIdParams,
        credential: Option<&Credential>,
    ) -> Result<Chat, ClientError> {
        client.get_chat(&params.chat_id, credential).await
    }

    fn summarize(chat: &Chat) -> String {
        format!(
            "Chat '{}' ({}) with {} messages",
            chat.title,
            chat.id,
            chat.chat.messages.len()
        )
    }
}

pub struct DeleteChatTool;

#[async_trait]
impl AdminTool for DeleteChatTool {
    const NAME: &'static str = "delete_chat";
    const DESCRIPTION: &'static str = "Delete one chat.";
    const TIER: PermissionTier = PermissionTier::Own;
    const EFFECT: ToolEffect = ToolEffect::Destructive;

    type Params = ChatIdParams;
    type Output = DeletionResult;

    fn validate(params: &ChatIdParams) -> Result<(), ToolError> {
        require_id("chat_id", &params.chat_id)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: ChatIdParams,
        credential: Option<&Credential>,
    ) -> Result<DeletionResult, ClientError> {
        let deletion = client.delete_chat(&params.chat_id, credential).await?;
        Ok(DeletionResult::new(params.chat_id, deletion))
    }

    fn summarize(result: &DeletionResult) -> String {
        result.summary("chat")
    }
}

pub struct DeleteAllChatsTool;

#[async_trait]
impl AdminTool for DeleteAllChatsTool {
    const NAME: &'static str = "delete_all_chats";
    const DESCRIPTION: &'static str =
        "Delete ALL chats of the caller. This cannot be undone.";
    const TIER: PermissionTier = PermissionTier::Own;
    const EFFECT: ToolEffect = ToolEffect::Destructive;

    type Params = NoParams;
    type Output = DeletionResult;

    async fn call(
        client: &OpenWebUiClient,
        _params: NoParams,
        credential: Option<&Credential>,
    ) -> Result<DeletionResult, ClientError> {
        let deletion = client.delete_all_chats(credential).await?;
        Ok(DeletionResult::bulk(deletion))
    }

    fn summarize(result: &DeletionResult) -> String {
        result.summary("chats")
    }
}
