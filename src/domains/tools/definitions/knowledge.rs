//! Knowledge base tools.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{DeletionResult, NoParams, require_id, require_text};
use crate::domains::openwebui::models::KnowledgeBase;
use crate::domains::openwebui::{ClientError, Credential, OpenWebUiClient};
use crate::domains::tools::{AdminTool, PermissionTier, ToolEffect, ToolError};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct KnowledgeIdParams {
    /// ID of the knowledge base.
    pub knowledge_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateKnowledgeBaseParams {
    /// Name of the knowledge base.
    pub name: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

pub struct ListKnowledgeBasesTool;

#[async_trait]
impl AdminTool for ListKnowledgeBasesTool {
    const NAME: &'static str = "list_knowledge_bases";
    const DESCRIPTION: &'static str = "List the knowledge bases visible to the caller.";
    const TIER: PermissionTier = PermissionTier::Any;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = NoParams;
    type Output = Vec<KnowledgeBase>;

    async fn call(
        client: &OpenWebUiClient,
        _params: NoParams,
        credential: Option<&Credential>,
    ) -> Result<Vec<KnowledgeBase>, ClientError> {
        client.list_knowledge_bases(credential).await
    }

    fn summarize(bases: &Vec<KnowledgeBase>) -> String {
        format!("Found {} knowledge bases", bases.len())
    }
}

pub struct GetKnowledgeBaseTool;

#[async_trait]
impl AdminTool for GetKnowledgeBaseTool {
    const NAME: &'static str = "get_knowledge_base";
    const DESCRIPTION: &'static str = "Get a knowledge base and the files it contains.";
    const TIER: PermissionTier = PermissionTier::Own;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = KnowledgeIdParams;
    type Output = KnowledgeBase;

    fn validate(params: &KnowledgeIdParams) -> Result<(), ToolError> {
        require_id("knowledge_id", &params.knowledge_id)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: KnowledgeIdParams,
        credential: Option<&Credential>,
    ) -> Result<KnowledgeBase, ClientError> {
        client
            .get_knowledge_base(&params.knowledge_id, credential)
            .await
    }

    fn summarize(base: &KnowledgeBase) -> String {
        format!(
            "Knowledge base '{}' ({}) with {} files",
            base.name,
            base.id,
            base.files.len()
        )
    }
}

pub struct CreateKnowledgeBaseTool;

#[async_trait]
impl AdminTool for CreateKnowledgeBaseTool {
    const NAME: &'static str = "create_knowledge_base";
    const DESCRIPTION: &'static str = "Create an empty knowledge base owned by the caller.";
    const TIER: PermissionTier = PermissionTier::Any;
    const EFFECT: ToolEffect = ToolEffect::Write;

    type Params = CreateKnowledgeBaseParams;
    type Output = KnowledgeBase;

    fn validate(params: &CreateKnowledgeBaseParams) -> Result<(), ToolError> {
        require_text("name", &params.name)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: CreateKnowledgeBaseParams,
        credential: Option<&Credential>,
    ) -> Result<KnowledgeBase, ClientError> {
        let description = params.description.unwrap_or_default();
        client
            .create_knowledge_base(&params.name, &description, credential)
            .await
    }

    fn summarize(base: &KnowledgeBase) -> String {
        format!("Created knowledge base '{}' ({})", base.name, base.id)
    }
}

pub struct DeleteKnowledgeBaseTool;

#[async_trait]
impl AdminTool for DeleteKnowledgeBaseTool {
    const NAME: &'static str = "delete_knowledge_base";
    const DESCRIPTION: &'static str =
        "Delete a knowledge base. Files stay in Open WebUI but are no longer grouped.";
    const TIER: PermissionTier = PermissionTier::Owner;
    const EFFECT: ToolEffect = ToolEffect::Destructive;

    type Params = KnowledgeIdParams;
    type Output = DeletionResult;

    fn validate(params: &KnowledgeIdParams) -> Result<(), ToolError> {
        require_id("knowledge_id", &params.knowledge_id)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: KnowledgeIdParams,
        credential: Option<&Credential>,
    ) -> Result<DeletionResult, ClientError> {
        let deletion = client
            .delete_knowledge_base(&params.knowledge_id, credential)
            .await?;
        Ok(DeletionResult::new(params.knowledge_id, deletion))
    }

    fn summarize(result: &DeletionResult) -> String {
        result.summary("knowledge base")
    }
}
