//! Typed HTTP client for the Open WebUI REST API.
//!
//! Every operation issues exactly one request. There are no retries: a
//! failed administrative call is reported to the caller as failed rather
//! than silently repeated.

use std::time::Duration;

use reqwest::{Method, Url, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use super::credential::Credential;
use super::error::{ClientError, UpstreamError};
use super::models::{
    Chat, ChatSummary, Deletion, FunctionSummary, Group, JsonMap, KnowledgeBase,
    KnowledgeListBody, Model, ModelListBody, Role, SessionUser, SystemConfig, ToolSummary, User,
    UserPage,
};
use crate::core::config::UpstreamConfig;

/// Longest slice of a non-JSON error body echoed back to the caller.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Immutable client for one Open WebUI instance.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct OpenWebUiClient {
    http: reqwest::Client,
    base_url: Url,
    default_credential: Option<Credential>,
}

impl OpenWebUiClient {
    /// Create a client for `base_url`.
    pub fn new(
        base_url: &str,
        default_credential: Option<Credential>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::invalid_request(format!("invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::invalid_request(format!(
                "base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("openwebui-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::invalid_request(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            default_credential,
        })
    }

    /// Create a client from the upstream section of the server configuration.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.base_url,
            Credential::from_optional(config.api_key.as_deref()),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a default credential was configured.
    pub fn has_default_credential(&self) -> bool {
        self.default_credential.is_some()
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn get_current_user(
        &self,
        credential: Option<&Credential>,
    ) -> Result<SessionUser, ClientError> {
        self.get(&["api", "v1", "auths", ""], credential).await
    }

    pub async fn list_users(&self, credential: Option<&Credential>) -> Result<UserPage, ClientError> {
        self.get(&["api", "v1", "users", ""], credential).await
    }

    pub async fn get_user(
        &self,
        user_id: &str,
        credential: Option<&Credential>,
    ) -> Result<User, ClientError> {
        self.get(&["api", "v1", "users", user_id], credential).await
    }

    pub async fn update_user_role(
        &self,
        user_id: &str,
        role: Role,
        credential: Option<&Credential>,
    ) -> Result<User, ClientError> {
        self.post(
            &["api", "v1", "users", user_id, "update", "role"],
            &json!({ "role": role }),
            credential,
        )
        .await
    }

    pub async fn delete_user(
        &self,
        user_id: &str,
        credential: Option<&Credential>,
    ) -> Result<Deletion, ClientError> {
        self.delete(&["api", "v1", "users", user_id], credential).await
    }

    // ========================================================================
    // Groups
    // ========================================================================

    pub async fn list_groups(&self, credential: Option<&Credential>) -> Result<Vec<Group>, ClientError> {
        self.get(&["api", "v1", "groups", ""], credential).await
    }

    pub async fn create_group(
        &self,
        name: &str,
        description: &str,
        credential: Option<&Credential>,
    ) -> Result<Group, ClientError> {
        self.post(
            &["api", "v1", "groups", "create"],
            &json!({ "name": name, "description": description }),
            credential,
        )
        .await
    }

    pub async fn get_group(
        &self,
        group_id: &str,
        credential: Option<&Credential>,
    ) -> Result<Group, ClientError> {
        self.get(&["api", "v1", "groups", "id", group_id], credential).await
    }

    /// Only the fields that are `Some` are sent.
    pub async fn update_group(
        &self,
        group_id: &str,
        name: Option<&str>,
        description: Option<&str>,
        credential: Option<&Credential>,
    ) -> Result<Group, ClientError> {
        let mut body = JsonMap::new();
        if let Some(name) = name {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(description) = description {
            body.insert("description".to_string(), json!(description));
        }
        self.post(
            &["api", "v1", "groups", "id", group_id, "update"],
            &body,
            credential,
        )
        .await
    }

    pub async fn add_user_to_group(
        &self,
        group_id: &str,
        user_id: &str,
        credential: Option<&Credential>,
    ) -> Result<Group, ClientError> {
        self.post(
            &["api", "v1", "groups", "id", group_id, "users", "add"],
            &json!({ "user_id": user_id }),
            credential,
        )
        .await
    }

    pub async fn remove_user_from_group(
        &self,
        group_id: &str,
        user_id: &str,
        credential: Option<&Credential>,
    ) -> Result<Group, ClientError> {
        self.post(
            &["api", "v1", "groups", "id", group_id, "users", "remove"],
            &json!({ "user_id": user_id }),
            credential,
        )
        .await
    }

    pub async fn delete_group(
        &self,
        group_id: &str,
        credential: Option<&Credential>,
    ) -> Result<Deletion, ClientError> {
        self.delete(&["api", "v1", "groups", "id", group_id], credential).await
    }

    // ========================================================================
    // Models
    // ========================================================================

    pub async fn list_models(&self, credential: Option<&Credential>) -> Result<Vec<Model>, ClientError> {
        let body: ModelListBody = self.get(&["api", "v1", "models", ""], credential).await?;
        Ok(body.into())
    }

    pub async fn get_model(
        &self,
        model_id: &str,
        credential: Option<&Credential>,
    ) -> Result<Model, ClientError> {
        self.get(&["api", "v1", "models", model_id], credential).await
    }

    pub async fn create_model(
        &self,
        id: &str,
        name: &str,
        base_model_id: &str,
        meta: JsonMap,
        params: JsonMap,
        credential: Option<&Credential>,
    ) -> Result<Model, ClientError> {
        self.post(
            &["api", "v1", "models", "create"],
            &json!({
                "id": id,
                "name": name,
                "base_model_id": base_model_id,
                "meta": meta,
                "params": params,
            }),
            credential,
        )
        .await
    }

    /// Only the fields that are `Some` are sent.
    pub async fn update_model(
        &self,
        model_id: &str,
        name: Option<&str>,
        meta: Option<JsonMap>,
        params: Option<JsonMap>,
        credential: Option<&Credential>,
    ) -> Result<Model, ClientError> {
        let mut body = JsonMap::new();
        if let Some(name) = name {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(meta) = meta {
            body.insert("meta".to_string(), Value::Object(meta));
        }
        if let Some(params) = params {
            body.insert("params".to_string(), Value::Object(params));
        }
        self.post(
            &["api", "v1", "models", model_id, "update"],
            &body,
            credential,
        )
        .await
    }

    pub async fn delete_model(
        &self,
        model_id: &str,
        credential: Option<&Credential>,
    ) -> Result<Deletion, ClientError> {
        self.delete(&["api", "v1", "models", model_id], credential).await
    }

    // ========================================================================
    // Knowledge bases
    // ========================================================================

    pub async fn list_knowledge_bases(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<KnowledgeBase>, ClientError> {
        let body: KnowledgeListBody = self.get(&["api", "v1", "knowledge", ""], credential).await?;
        Ok(body.into())
    }

    pub async fn get_knowledge_base(
        &self,
        knowledge_id: &str,
        credential: Option<&Credential>,
    ) -> Result<KnowledgeBase, ClientError> {
        self.get(&["api", "v1", "knowledge", knowledge_id], credential).await
    }

    pub async fn create_knowledge_base(
        &self,
        name: &str,
        description: &str,
        credential: Option<&Credential>,
    ) -> Result<KnowledgeBase, ClientError> {
        self.post(
            &["api", "v1", "knowledge", "create"],
            &json!({ "name": name, "description": description }),
            credential,
        )
        .await
    }

    pub async fn delete_knowledge_base(
        &self,
        knowledge_id: &str,
        credential: Option<&Credential>,
    ) -> Result<Deletion, ClientError> {
        self.delete(&["api", "v1", "knowledge", knowledge_id], credential).await
    }

    // ========================================================================
    // Chats
    // ========================================================================

    pub async fn list_chats(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<ChatSummary>, ClientError> {
        self.get(&["api", "v1", "chats", ""], credential).await
    }

    pub async fn get_chat(
        &self,
        chat_id: &str,
        credential: Option<&Credential>,
    ) -> Result<Chat, ClientError> {
        self.get(&["api", "v1", "chats", chat_id], credential).await
    }

    pub async fn delete_chat(
        &self,
        chat_id: &str,
        credential: Option<&Credential>,
    ) -> Result<Deletion, ClientError> {
        self.delete(&["api", "v1", "chats", chat_id], credential).await
    }

    pub async fn delete_all_chats(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Deletion, ClientError> {
        self.delete(&["api", "v1", "chats", ""], credential).await
    }

    // ========================================================================
    // Tools, functions, configuration
    // ========================================================================

    pub async fn list_tools(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<ToolSummary>, ClientError> {
        self.get(&["api", "v1", "tools", ""], credential).await
    }

    pub async fn get_tool(
        &self,
        tool_id: &str,
        credential: Option<&Credential>,
    ) -> Result<ToolSummary, ClientError> {
        self.get(&["api", "v1", "tools", "id", tool_id], credential).await
    }

    pub async fn list_functions(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<FunctionSummary>, ClientError> {
        self.get(&["api", "v1", "functions", ""], credential).await
    }

    pub async fn get_function(
        &self,
        function_id: &str,
        credential: Option<&Credential>,
    ) -> Result<FunctionSummary, ClientError> {
        self.get(&["api", "v1", "functions", "id", function_id], credential)
            .await
    }

    pub async fn get_system_config(
        &self,
        credential: Option<&Credential>,
    ) -> Result<SystemConfig, ClientError> {
        self.get(&["api", "v1", "configs", ""], credential).await
    }

    // ========================================================================
    // Request plumbing
    // ========================================================================

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        credential: Option<&Credential>,
    ) -> Result<T, ClientError> {
        self.send(Method::GET, segments, None::<&()>, credential).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        credential: Option<&Credential>,
    ) -> Result<T, ClientError> {
        self.send(Method::POST, segments, Some(body), credential).await
    }

    async fn delete<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        credential: Option<&Credential>,
    ) -> Result<T, ClientError> {
        self.send(Method::DELETE, segments, None::<&()>, credential).await
    }

    /// Build the URL for `segments`, appended to the base URL path.
    ///
    /// Each segment is percent-encoded on its own, so an identifier can never
    /// introduce extra path components. Dot segments are rejected since the
    /// URL parser would drop them. A trailing empty segment yields a trailing
    /// slash.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(ClientError::invalid_request(format!(
                "'{}' is not a valid identifier",
                bad
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::invalid_request(format!("base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// The override wins when present, otherwise the default applies.
    fn credential_for<'a>(&'a self, credential: Option<&'a Credential>) -> Option<&'a Credential> {
        credential.or(self.default_credential.as_ref())
    }

    #[instrument(skip_all, fields(method = %method))]
    async fn send<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        credential: Option<&Credential>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        debug!("Forwarding {} {}", method, path);

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(header::ACCEPT, "application/json");
        if let Some(credential) = self.credential_for(credential) {
            request = request.header(header::AUTHORIZATION, credential.header_value());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ClientError::from_reqwest)?;
        let status = response.status();

        if !status.is_success() {
            // The status alone decides the outcome; an unreadable body only
            // costs the detail message.
            let bytes = response.bytes().await.unwrap_or_else(|e| {
                debug!("Could not read error body of {} {}: {}", method, path, e);
                Default::default()
            });
            let message = extract_error_message(&bytes, status.canonical_reason());
            warn!("{} {} failed with {}: {}", method, path, status.as_u16(), message);
            return Err(UpstreamError {
                method: method.to_string(),
                path,
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(ClientError::from_reqwest)?;
        debug!("{} {} -> {} ({} bytes)", method, path, status.as_u16(), bytes.len());
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::response_shape(path, format!("JSON parse error: {}", e)))
    }
}

/// Pull a readable message out of an error response body.
///
/// Open WebUI is a FastAPI app: errors carry `detail`, either a string or a
/// list of validation entries with `msg`.
fn extract_error_message(body: &[u8], reason: Option<&str>) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        match value.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(Value::Array(entries)) => {
                let messages: Vec<&str> = entries
                    .iter()
                    .filter_map(|e| e.get("msg").and_then(Value::as_str))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        reason.unwrap_or("no response body").to_string()
    } else {
        text.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}
