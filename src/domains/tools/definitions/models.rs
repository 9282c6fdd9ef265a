//! Model configuration tools.
//!
//! Besides raw `meta` / `params` objects, `create_model` and `update_model`
//! take the usual knobs directly: `system_prompt` lands in `meta.system`,
//! `temperature` and `max_tokens` in `params`. The direct fields win over
//! same-named keys of the raw objects.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use super::common::{DeletionResult, NoParams, require_id, require_text};
use crate::domains::openwebui::models::{JsonMap, Model};
use crate::domains::openwebui::{ClientError, Credential, OpenWebUiClient};
use crate::domains::tools::{AdminTool, PermissionTier, ToolEffect, ToolError};

const MAX_TEMPERATURE: f64 = 2.0;

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ModelIdParams {
    /// ID of the model (for example `llama3:8b` or `my-assistant`).
    pub model_id: String,
}

/// Generation settings shared by create and update.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ModelSettings {
    /// System prompt, stored as `meta.system`.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Sampling temperature between 0.0 and 2.0.
    #[serde(default)]
    pub temperature: Option<f64>,

    /// Maximum number of tokens to generate.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Raw `meta` object (description, capabilities, tags, ...).
    #[serde(default)]
    pub meta: Option<JsonMap>,

    /// Raw `params` object (advanced generation parameters).
    #[serde(default)]
    pub params: Option<JsonMap>,
}

impl ModelSettings {
    fn validate(&self) -> Result<(), ToolError> {
        if let Some(temperature) = self.temperature {
            if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
                return Err(ToolError::invalid_argument(
                    "temperature",
                    format!("must be between 0.0 and {MAX_TEMPERATURE}"),
                ));
            }
        }
        if self.max_tokens == Some(0) {
            return Err(ToolError::invalid_argument(
                "max_tokens",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.system_prompt.is_none()
            && self.temperature.is_none()
            && self.max_tokens.is_none()
            && self.meta.is_none()
            && self.params.is_none()
    }

    /// `meta` to send, or `None` when nothing meta-related was given.
    fn merged_meta(&self) -> Option<JsonMap> {
        if self.meta.is_none() && self.system_prompt.is_none() {
            return None;
        }
        let mut meta = self.meta.clone().unwrap_or_default();
        if let Some(system_prompt) = &self.system_prompt {
            meta.insert("system".to_string(), json!(system_prompt));
        }
        Some(meta)
    }

    /// `params` to send, or `None` when nothing param-related was given.
    fn merged_params(&self) -> Option<JsonMap> {
        if self.params.is_none() && self.temperature.is_none() && self.max_tokens.is_none() {
            return None;
        }
        let mut params = self.params.clone().unwrap_or_default();
        if let Some(temperature) = self.temperature {
            params.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(max_tokens) = self.max_tokens {
            params.insert("max_tokens".to_string(), json!(max_tokens));
        }
        Some(params)
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateModelParams {
    /// Unique ID for the new model.
    pub id: String,

    /// Display name.
    pub name: String,

    /// ID of the underlying model (for example `llama3:8b`).
    pub base_model_id: String,

    #[serde(flatten)]
    pub settings: ModelSettings,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateModelParams {
    /// ID of the model to update.
    pub model_id: String,

    /// New display name.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub settings: ModelSettings,
}

fn describe(model: &Model) -> String {
    match &model.base_model_id {
        Some(base) => format!("Model '{}' ({}) based on {}", model.name, model.id, base),
        None => format!("Model '{}' ({})", model.name, model.id),
    }
}

// ============================================================================
// Tool Definitions
// ============================================================================

pub struct ListModelsTool;

#[async_trait]
impl AdminTool for ListModelsTool {
    const NAME: &'static str = "list_models";
    const DESCRIPTION: &'static str =
        "List the models available to the caller, including custom model configurations.";
    const TIER: PermissionTier = PermissionTier::Any;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = NoParams;
    type Output = Vec<Model>;

    async fn call(
        client: &OpenWebUiClient,
        _params: NoParams,
        credential: Option<&Credential>,
    ) -> Result<Vec<Model>, ClientError> {
        client.list_models(credential).await
    }

    fn summarize(models: &Vec<Model>) -> String {
        format!("Found {} models", models.len())
    }
}

pub struct GetModelTool;

#[async_trait]
impl AdminTool for GetModelTool {
    const NAME: &'static str = "get_model";
    const DESCRIPTION: &'static str =
        "Get a model configuration, including its system prompt and generation parameters.";
    const TIER: PermissionTier = PermissionTier::Any;
    const EFFECT: ToolEffect = ToolEffect::Read;

    type Params = ModelIdParams;
    type Output = Model;

    fn validate(params: &ModelIdParams) -> Result<(), ToolError> {
        require_id("model_id", &params.model_id)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: ModelIdParams,
        credential: Option<&Credential>,
    ) -> Result<Model, ClientError> {
        client.get_model(&params.model_id, credential).await
    }

    fn summarize(model: &Model) -> String {
        describe(model)
    }
}

pub struct CreateModelTool;

#[async_trait]
impl AdminTool for CreateModelTool {
    const NAME: &'static str = "create_model";
    const DESCRIPTION: &'static str = "Create a custom model configuration on top of a base model, \
         optionally with a system prompt, temperature and max_tokens.";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Write;

    type Params = CreateModelParams;
    type Output = Model;

    fn validate(params: &CreateModelParams) -> Result<(), ToolError> {
        require_id("id", &params.id)?;
        require_text("name", &params.name)?;
        require_id("base_model_id", &params.base_model_id)?;
        params.settings.validate()
    }

    async fn call(
        client: &OpenWebUiClient,
        params: CreateModelParams,
        credential: Option<&Credential>,
    ) -> Result<Model, ClientError> {
        let meta = params.settings.merged_meta().unwrap_or_default();
        let model_params = params.settings.merged_params().unwrap_or_default();
        client
            .create_model(
                &params.id,
                &params.name,
                &params.base_model_id,
                meta,
                model_params,
                credential,
            )
            .await
    }

    fn summarize(model: &Model) -> String {
        format!("Created {}", describe(model))
    }
}

pub struct UpdateModelTool;

#[async_trait]
impl AdminTool for UpdateModelTool {
    const NAME: &'static str = "update_model";
    const DESCRIPTION: &'static str = "Update a model configuration. Only the given fields change; \
         at least one of name, system_prompt, temperature, max_tokens, meta or params is required.";
    const TIER: PermissionTier = PermissionTier::Owner;
    const EFFECT: ToolEffect = ToolEffect::Write;

    type Params = UpdateModelParams;
    type Output = Model;

    fn validate(params: &UpdateModelParams) -> Result<(), ToolError> {
        require_id("model_id", &params.model_id)?;
        if params.name.is_none() && params.settings.is_empty() {
            return Err(ToolError::invalid_arguments(
                Vec::new(),
                "at least one field to update is required",
            ));
        }
        if let Some(name) = &params.name {
            require_text("name", name)?;
        }
        params.settings.validate()
    }

    async fn call(
        client: &OpenWebUiClient,
        params: UpdateModelParams,
        credential: Option<&Credential>,
    ) -> Result<Model, ClientError> {
        client
            .update_model(
                &params.model_id,
                params.name.as_deref(),
                params.settings.merged_meta(),
                params.settings.merged_params(),
                credential,
            )
            .await
    }

    fn summarize(model: &Model) -> String {
        format!("Updated {}", describe(model))
    }
}

pub struct DeleteModelTool;

#[async_trait]
impl AdminTool for DeleteModelTool {
    const NAME: &'static str = "delete_model";
    const DESCRIPTION: &'static str = "Delete a custom model configuration.";
    const TIER: PermissionTier = PermissionTier::Admin;
    const EFFECT: ToolEffect = ToolEffect::Destructive;

    type Params = ModelIdParams;
    type Output = DeletionResult;

    fn validate(params: &ModelIdParams) -> Result<(), ToolError> {
        require_id("model_id", &params.model_id)
    }

    async fn call(
        client: &OpenWebUiClient,
        params: ModelIdParams,
        credential: Option<&Credential>,
    ) -> Result<DeletionResult, ClientError> {
        let deletion = client.delete_model(&params.model_id, credential).await?;
        Ok(DeletionResult::new(params.model_id, deletion))
    }

    fn summarize(result: &DeletionResult) -> String {
        result.summary("model")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(value: serde_json::Value) -> ModelSettings {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_temperature_bounds() {
        assert!(settings(json!({"temperature": 0.0})).validate().is_ok());
        assert!(settings(json!({"temperature": 2.0})).validate().is_ok());
        assert!(settings(json!({"temperature": 2.5})).validate().is_err());
        assert!(settings(json!({"temperature": -0.1})).validate().is_err());
    }

    #[test]
    fn test_max_tokens_positive() {
        let err = settings(json!({"max_tokens": 0})).validate().unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
        assert!(settings(json!({"max_tokens": 512})).validate().is_ok());
    }

    #[test]
    fn test_merge_convenience_fields() {
        let s = settings(json!({
            "system_prompt": "You are terse.",
            "temperature": 0.5,
            "meta": {"description": "helper", "system": "old"},
            "params": {"top_p": 0.9}
        }));
        let meta = s.merged_meta().unwrap();
        assert_eq!(meta["system"], json!("You are terse."));
        assert_eq!(meta["description"], json!("helper"));

        let params = s.merged_params().unwrap();
        assert_eq!(params["temperature"], json!(0.5));
        assert_eq!(params["top_p"], json!(0.9));
        assert!(!params.contains_key("max_tokens"));
    }

    #[test]
    fn test_nothing_to_merge() {
        let s = ModelSettings::default();
        assert!(s.is_empty());
        assert!(s.merged_meta().is_none());
        assert!(s.merged_params().is_none());
    }

    #[test]
    fn test_update_model_requires_a_field() {
        let params: UpdateModelParams =
            serde_json::from_value(json!({"model_id": "my-assistant"})).unwrap();
        assert!(UpdateModelTool::validate(&params).is_err());

        let params: UpdateModelParams =
            serde_json::from_value(json!({"model_id": "my-assistant", "temperature": 0.2})).unwrap();
        assert!(UpdateModelTool::validate(&params).is_ok());
    }
}
