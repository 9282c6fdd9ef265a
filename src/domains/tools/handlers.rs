//! Tool handlers module.
//!
//! Every Open WebUI tool implements [`AdminTool`]: a name, a description, the
//! Open WebUI permission tier it needs, typed parameters and one upstream call.
//! The generic functions here turn an implementation into MCP metadata
//! ([`to_tool`]) and into a call that always yields an enveloped result
//! ([`invoke`]).

use std::fmt;

use async_trait::async_trait;
use futures::{FutureExt, future::BoxFuture};
use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, JsonObject, Tool, ToolAnnotations},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{info, instrument, warn};

use super::arguments::parse_arguments;
use super::envelope::{ToolEnvelope, ToolFailure};
use super::error::{ErrorKind, ToolError};
use crate::domains::openwebui::{ClientError, Credential, OpenWebUiClient};

/// Open WebUI permission a caller needs for an operation.
///
/// Documentation only: Open WebUI decides, the server just forwards the
/// credential and reports the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionTier {
    /// Any authenticated user.
    Any,
    /// The owner of the resource, or an admin.
    Own,
    /// Admin only.
    Admin,
    /// Admin, or the owner of the resource where ownership applies.
    Owner,
}

impl PermissionTier {
    /// Sentence appended to tool descriptions.
    pub fn notice(self) -> &'static str {
        match self {
            Self::Any => "Permission: any authenticated user (enforced by Open WebUI).",
            Self::Own => "Permission: your own resources only (enforced by Open WebUI).",
            Self::Admin => "Permission: admin only (enforced by Open WebUI).",
            Self::Owner => "Permission: admin or resource owner (enforced by Open WebUI).",
        }
    }
}

impl fmt::Display for PermissionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Any => "any",
            Self::Own => "own",
            Self::Admin => "admin",
            Self::Owner => "owner",
        };
        f.write_str(label)
    }
}

/// What an operation does to upstream state. Drives MCP tool annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolEffect {
    Read,
    Write,
    Destructive,
}

impl ToolEffect {
    pub fn annotations(self) -> ToolAnnotations {
        ToolAnnotations {
            read_only_hint: Some(self == Self::Read),
            destructive_hint: Some(self == Self::Destructive),
            idempotent_hint: Some(self != Self::Write),
            open_world_hint: Some(true),
            ..Default::default()
        }
    }
}

/// Arguments of every tool: the tool's own parameters plus an optional
/// per-call credential.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToolArgs<P> {
    #[serde(flatten)]
    pub params: P,

    /// Your Open WebUI API key. Overrides the server's default key for this call only.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// An Open WebUI operation exposed as an MCP tool.
#[async_trait]
pub trait AdminTool: Send + Sync + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    const TIER: PermissionTier;

    const EFFECT: ToolEffect;

    type Params: DeserializeOwned + JsonSchema + Send + Sync + 'static;

    type Output: Serialize + Send;

    /// Semantic checks that the schema cannot express.
    fn validate(_params: &Self::Params) -> Result<(), ToolError> {
        Ok(())
    }

    /// Perform the upstream call.
    async fn call(
        client: &OpenWebUiClient,
        params: Self::Params,
        credential: Option<&Credential>,
    ) -> Result<Self::Output, ClientError>;

    /// One-line summary of a successful result.
    fn summarize(_output: &Self::Output) -> String {
        format!("{} succeeded", Self::NAME)
    }
}

/// Create a Tool model (metadata) for `T`.
pub fn to_tool<T: AdminTool>() -> Tool {
    Tool {
        name: T::NAME.into(),
        description: Some(format!("{}\n\n{}", T::DESCRIPTION, T::TIER.notice()).into()),
        input_schema: cached_schema_for_type::<ToolArgs<T::Params>>(),
        annotations: Some(T::EFFECT.annotations()),
        output_schema: Some(cached_schema_for_type::<ToolEnvelope>()),
        icons: None,
        meta: None,
        title: None,
    }
}

/// Run `T` against Open WebUI. Failures are returned as failed envelopes,
/// never as protocol errors.
#[instrument(skip_all, fields(tool = T::NAME))]
pub async fn invoke<T: AdminTool>(client: &OpenWebUiClient, arguments: JsonObject) -> CallToolResult {
    match run::<T>(client, arguments).await {
        Ok(output) => {
            let summary = T::summarize(&output);
            match serde_json::to_value(&output) {
                Ok(data) => {
                    info!("{}", summary);
                    ToolEnvelope::success(data).into_call_result(summary)
                }
                Err(e) => {
                    warn!("Failed to serialize {} result: {}", T::NAME, e);
                    let failure = ToolFailure::new(
                        ErrorKind::ResponseShape,
                        format!("Could not serialize result: {}", e),
                    );
                    let message = failure.message.clone();
                    ToolEnvelope::failure(failure).into_call_result(message)
                }
            }
        }
        Err(e) => {
            warn!(kind = ?e.kind(), "{} failed: {}", T::NAME, e);
            ToolEnvelope::from(&e).into_call_result(e.to_string())
        }
    }
}

async fn run<T: AdminTool>(
    client: &OpenWebUiClient,
    arguments: JsonObject,
) -> Result<T::Output, ToolError> {
    let args: ToolArgs<T::Params> = parse_arguments(arguments)?;
    T::validate(&args.params)?;

    let credential = Credential::from_optional(args.api_key.as_deref());
    if credential.is_none() && !client.has_default_credential() {
        warn!("{} called without any credential", T::NAME);
    }

    Ok(T::call(client, args.params, credential.as_ref()).await?)
}

/// Type-erased entry point used by the registry and the router.
pub type Dispatch = for<'a> fn(&'a OpenWebUiClient, JsonObject) -> BoxFuture<'a, CallToolResult>;

pub(crate) fn dispatch<'a, T: AdminTool>(
    client: &'a OpenWebUiClient,
    arguments: JsonObject,
) -> BoxFuture<'a, CallToolResult> {
    invoke::<T>(client, arguments).boxed()
}
