//! Typed records for the Open WebUI resources exposed as tools.
//!
//! Each struct names the fields the tools rely on. Required fields are plain
//! types, so a response lacking them fails to deserialize and surfaces as a
//! response shape error instead of leaking untyped data. Free-form upstream
//! maps (`meta`, `params`, `permissions`) stay JSON objects.

use schemars::JsonSchema;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A free-form JSON object.
pub type JsonMap = Map<String, Value>;

/// Open WebUI writes unset optional fields as `null`; read those as the
/// field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A list returned either bare or inside an object under `key`, with the
/// object's `total` when present. Item errors name the failing index.
fn bare_or_wrapped<'de, D, T>(
    deserializer: D,
    key: &str,
) -> Result<(Vec<T>, Option<usize>), D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let (items, total) = match Value::deserialize(deserializer)? {
        Value::Array(items) => (items, None),
        Value::Object(mut object) => {
            let total = object
                .get("total")
                .and_then(Value::as_u64)
                .map(|total| total as usize);
            match object.remove(key) {
                Some(Value::Array(items)) => (items, total),
                Some(Value::Null) | None => {
                    return Err(D::Error::custom(format!("missing field `{}`", key)));
                }
                Some(_) => {
                    return Err(D::Error::custom(format!("'{}' is not a list", key)));
                }
            }
        }
        other => {
            return Err(D::Error::custom(format!(
                "expected a list, found {}",
                json_kind(&other)
            )));
        }
    };

    let items = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| D::Error::custom(format!("item [{}]: {}", index, e)))
        })
        .collect::<Result<Vec<T>, _>>()?;
    Ok((items, total))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Users
// ============================================================================

/// Account role in Open WebUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to all features.
    Admin,
    /// Standard user access.
    User,
    /// Awaiting approval.
    Pending,
}

/// An Open WebUI account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// The account behind the credential used for the call.
///
/// The upstream response also echoes the session token; it is deliberately
/// not part of this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<JsonMap>,
}

/// A page of users.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: usize,
}

impl<'de> Deserialize<'de> for UserPage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Older Open WebUI releases return a bare array, newer ones a page object.
        let (users, total) = bare_or_wrapped(deserializer, "users")?;
        let total = total.unwrap_or(users.len());
        Ok(Self { users, total })
    }
}

// ============================================================================
// Groups
// ============================================================================

/// A named collection of users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

// ============================================================================
// Models
// ============================================================================

/// A custom model definition layered over a base model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Model {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_model_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: JsonMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: JsonMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// `GET /api/v1/models/` is either a bare array or `{"data": [...]}`.
pub(crate) struct ModelListBody(Vec<Model>);

impl<'de> Deserialize<'de> for ModelListBody {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        bare_or_wrapped(deserializer, "data").map(|(models, _)| Self(models))
    }
}

impl From<ModelListBody> for Vec<Model> {
    fn from(body: ModelListBody) -> Self {
        body.0
    }
}

// ============================================================================
// Knowledge bases
// ============================================================================

/// A file attached to a knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KnowledgeFile {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: JsonMap,
}

/// A document collection used for retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KnowledgeBase {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Owner of the knowledge base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub files: Vec<KnowledgeFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// `GET /api/v1/knowledge/` is either a bare array or `{"items": [...]}`.
pub(crate) struct KnowledgeListBody(Vec<KnowledgeBase>);

impl<'de> Deserialize<'de> for KnowledgeListBody {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        bare_or_wrapped(deserializer, "items").map(|(items, _)| Self(items))
    }
}

impl From<KnowledgeListBody> for Vec<KnowledgeBase> {
    fn from(body: KnowledgeListBody) -> Self {
        body.0
    }
}

// ============================================================================
// Chats
// ============================================================================

/// One row of the chat list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChatSummary {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// A single message of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Conversation body stored by Open WebUI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChatBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<ChatMessage>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub models: Vec<String>,
}

/// A full conversation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Chat {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chat: ChatBody,
    #[serde(default, deserialize_with = "null_as_default")]
    pub archived: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

// ============================================================================
// Tools, functions, configuration
// ============================================================================

/// A tool installed in Open WebUI (not to be confused with the MCP tools
/// this server exposes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: JsonMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// A function (filter, pipe or action).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FunctionSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_global: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: JsonMap,
}

/// System configuration as exported by Open WebUI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SystemConfig(pub JsonMap);

/// Acknowledgement of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Deletion(pub bool);
