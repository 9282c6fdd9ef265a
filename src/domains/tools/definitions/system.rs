//! Tools, functions and instance configuration.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{NoParams, require_id};
use crate::domains::openwebui::models::{FunctionSummary, SystemConfig, ToolSummary};
use crate::domains::openwebui::{ClientError, Credential, OpenWebUiClient};
use crate::domains::tools::{AdminTool, PermissionTier, ToolEffect, ToolError};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ToolIdParams {
    /// ID of the Open WebUI tool.
    pub tool_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FunctionIdParams {
    /// ID of the function (filter, action or pipe).
    pub function_id: String,
}

pub struct ListToolsTool;

#[async_trait]
impl AdminTool for ListToolsTool {
    const NAME: &'static str = "list_tools";
    const DESCRIPTION: &'static str =
        "List the tools installed in Open WebUI (Python toolkits models can call).";
    const TIER: PermissionTier = PermissionTier::Any;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = NoParams;
    type Output = Vec<ToolSummary>;

    async fn call(
        client: &OpenWebUiClient,
        _params: NoParams,
        credential: Option<&Credential>,
    ) -> Result<Vec<ToolSummary>, ClientError> {
        client.list_tools(credential).await
    }

    fn summarize(tools: &Vec<ToolSummary>) -> String {
        format!("Found {} tools", tools.len())
    }
}

pub struct GetToolTool;

#[async_trait]
impl AdminTool for GetToolTool {
    const NAME: &'static str = "get_tool";
    const DESCRIPTION: &'static str = "Get details of an installed Open WebUI tool.";
    const TIER: PermissionTier = PermissionTier::Any;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = ToolIdParams;
    type Output = ToolSummary;

    fn validate(params: &ToolIdParams) -> Result<(), ToolError> {
        require_id("tool_id", &params.tool_id)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: ToolIdParams,
        credential: Option<&Credential>,
    ) -> Result<ToolSummary, ClientError> {
        client.get_tool(&params.tool_id, credential).await
    }

    fn summarize(tool: &ToolSummary) -> String {
        format!("Tool '{}' ({})", tool.name, tool.id)
    }
}

pub struct ListFunctionsTool;

#[async_trait]
impl AdminTool for ListFunctionsTool {
    const NAME: &'static str = "list_functions";
    const DESCRIPTION: &'static str = "List installed functions (filters, actions and pipes).";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = NoParams;
    type Output = Vec<FunctionSummary>;

    async fn call(
        client: &OpenWebUiClient,
        _params: NoParams,
        credential: Option<&Credential>,
    ) -> Result<Vec<FunctionSummary>, ClientError> {
        client.list_functions(credential).await
    }

    fn summarize(functions: &Vec<FunctionSummary>) -> String {
        let active = functions.iter().filter(|f| f.is_active).count();
        format!("Found {} functions ({} active)", functions.len(), active)
    }
}

pub struct GetFunctionTool;

#[async_trait]
impl AdminTool for GetFunctionTool {
    const NAME: &'static str = "get_function";
    const DESCRIPTION: &'static str = "Get details of an installed function.";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = FunctionIdParams;
    type Output = FunctionSummary;

    fn validate(params: &FunctionIdParams) -> Result<(), ToolError> {
        require_id("function_id", &params.function_id)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: FunctionIdParams,
        credential: Option<&Credential>,
    ) -> Result<FunctionSummary, ClientError> {
        client.get_function(&params.function_id, credential).await
    }

    fn summarize(function: &FunctionSummary) -> String {
        match &function.kind {
            Some(kind) => format!("Function '{}' ({}, {})", function.name, function.id, kind),
            None => format!("Function '{}' ({})", function.name, function.id),
        }
    }
}

pub struct GetSystemConfigTool;

#[async_trait]
impl AdminTool for GetSystemConfigTool {
    const NAME: &'static str = "get_system_config";
    const DESCRIPTION: &'static str = "Get the instance-wide Open WebUI configuration.";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = NoParams;
    type Output = SystemConfig;

    async fn call(
        client: &OpenWebUiClient,
        _params: NoParams,
        credential: Option<&Credential>,
    ) -> Result<SystemConfig, ClientError> {
        client.get_system_config(credential).await
    }

    fn summarize(config: &SystemConfig) -> String {
        format!("System configuration with {} sections", config.0.len())
    }
}
