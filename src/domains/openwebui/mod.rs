//! Open WebUI domain module.
//!
//! Typed access to the Open WebUI REST API:
//!
//! - `client.rs` - one method per supported endpoint
//! - `models.rs` - typed records for users, groups, models, knowledge bases, chats
//! - `credential.rs` - bearer token newtype with redacted `Debug`
//! - `error.rs` - transport / upstream / response shape errors
//!
//! Permission checks are done by Open WebUI itself. The client only forwards
//! the credential and reports what the upstream answered.

mod client;
mod credential;
mod error;
pub mod models;

pub use client::OpenWebUiClient;
pub use credential::Credential;
pub use error::{ClientError, UpstreamCategory, UpstreamError};
