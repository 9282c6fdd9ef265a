//! Tool definitions module.
//!
//! One file per Open WebUI area. Each tool is a unit struct implementing
//! [`AdminTool`](super::AdminTool).

pub mod chats;
pub mod common;
pub mod groups;
pub mod knowledge;
pub mod models;
pub mod system;
pub mod users;

pub use chats::{DeleteAllChatsTool, DeleteChatTool, GetChatTool, ListChatsTool};
pub use groups::{
    AddUserToGroupTool, CreateGroupTool, DeleteGroupTool, GetGroupTool, ListGroupsTool,
    RemoveUserFromGroupTool, UpdateGroupTool,
};
pub use knowledge::{
    CreateKnowledgeBaseTool, DeleteKnowledgeBaseTool, GetKnowledgeBaseTool, ListKnowledgeBasesTool,
};
pub use models::{CreateModelTool, DeleteModelTool, GetModelTool, ListModelsTool, UpdateModelTool};
pub use system::{
    GetFunctionTool, GetSystemConfigTool, GetToolTool, ListFunctionsTool, ListToolsTool,
};
pub use users::{DeleteUserTool, GetCurrentUserTool, GetUserTool, ListUsersTool, UpdateUserRoleTool};
